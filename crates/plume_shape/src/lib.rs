//! Plume Shape Recorder
//!
//! Records high-level vector drawing calls (paths, fills, strokes,
//! gradients, clips, transforms, text) into a compact tagged byte stream
//! instead of executing them. The stream is replayed later by a renderer
//! backend; nothing here rasterizes.
//!
//! - **[`Shape`]**: the recorder — one method per drawing call, appending a
//!   self-describing record to a caller-owned buffer
//! - **[`CommandReader`]**: the read side — a zero-copy iterator over a
//!   finished stream
//! - **[`ShapeFlags`]**: an aggregate bitmask (has text/gradients/images,
//!   reordering/caching policy) readable without decoding
//! - **[`validate::audit`]**: fail-soft protocol auditing (stack/clip
//!   balance, handle ranges) for finished streams
//! - **`strings`** (feature `dynamic-text`): the interning table behind
//!   dynamic text records
//!
//! The wire format is little-endian with IEEE-754 `f32` floats; per-tag
//! payload layouts are documented in [`command`].
//!
//! # Example
//!
//! ```
//! use plume_core::Color;
//! use plume_shape::{Command, CommandReader, Shape};
//!
//! let mut buf = Vec::new();
//! let mut shape = Shape::new(&mut buf);
//! shape.begin_path();
//! shape.move_to(0.0, 0.0);
//! shape.line_to(100.0, 0.0);
//! shape.line_to(100.0, 50.0);
//! shape.close_path();
//! shape.fill_convex_color(Color::BLUE, true);
//!
//! let commands: Vec<_> = CommandReader::new(&buf)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(commands.len(), 6);
//! assert_eq!(commands[0], Command::BeginPath);
//! ```

pub mod command;
pub mod decode;
pub mod flags;
pub mod shape;
#[cfg(feature = "dynamic-text")]
pub mod strings;
pub mod validate;
mod wire;

pub use command::CommandTag;
pub use decode::{Command, CommandReader, DecodeError};
pub use flags::ShapeFlags;
pub use shape::Shape;
#[cfg(feature = "dynamic-text")]
pub use strings::{SharedStringTable, StringTable};
pub use validate::{audit, StreamAudit, Violation};

// ─────────────────────────────────────────────────────────────────────────────
// Core type re-exports from plume_core (unified type system)
// ─────────────────────────────────────────────────────────────────────────────

pub use plume_core::{
    Alignment, ClipRule, Color, Font, GradientHandle, ImageHandle, ImagePatternHandle, LineCap,
    LineJoin, StringId,
};
