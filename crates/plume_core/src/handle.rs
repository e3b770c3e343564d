//! Opaque resource handles.
//!
//! Gradient and image-pattern handles are allocated by the recorder itself:
//! the Nth declaration in a stream yields handle N-1, and declaration order
//! is the only registry (the declaration records embedded in the stream carry
//! the parameters). Image, font, and string handles are allocated by external
//! resource managers and copied into the stream verbatim.

/// Reference to a gradient declared earlier in the same command stream.
///
/// Valid only for the stream that produced it, and only for records appended
/// after the declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GradientHandle(pub u16);

/// Reference to an image pattern declared earlier in the same command stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImagePatternHandle(pub u16);

/// Handle to an image owned by an external image manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u16);

/// Identifier of a string interned in an external string table.
///
/// Used by dynamic text commands; the recorder never reads or writes the
/// string content, only the id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StringId(pub u32);

/// Reference to a sized font instance owned by an external font system.
///
/// The pair is copied into text records verbatim; face lookup and shaping
/// happen entirely on the consumer side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    /// Font face id, allocated by the font system
    pub id: u16,
    /// Font size in pixels
    pub size: f32,
}

impl Font {
    pub fn new(id: u16, size: f32) -> Self {
        Self { id, size }
    }
}
