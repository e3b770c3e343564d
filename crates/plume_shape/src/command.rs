//! Command tags and their wire layouts.
//!
//! A recorded stream is a contiguous sequence of records, each a one-byte
//! tag followed by a tag-specific payload. There is no inter-record padding.
//! All multi-byte integers and floats are little-endian; floats are IEEE-754
//! single precision. Colors are four floats (RGBA), 16 bytes.
//!
//! Payload layouts by tag:
//!
//! | Tag | Payload |
//! |---|---|
//! | `BeginPath`, `ClosePath`, `PushState`, `PopState`, `EndClip`, `ResetClip` | none |
//! | `MoveTo`, `LineTo`, `Translate`, `Scale` | `f32 ×2` |
//! | `Rotate` | `f32` (radians) |
//! | `BezierTo` | `f32 ×6` (c1, c2, end) |
//! | `ArcTo` | `f32 ×5` (p1, p2, radius) |
//! | `Rect`, `Scissor`, `IntersectScissor` | `f32 ×4` (x, y, w, h) |
//! | `RoundedRect` | `f32 ×5` (x, y, w, h, r) |
//! | `RoundedRectVarying` | `f32 ×8` (x, y, w, h, r-tl, r-bl, r-br, r-tr) |
//! | `Circle` | `f32 ×3` (cx, cy, r) |
//! | `FillConvexColor`, `FillConcaveColor` | color, `u8` aa |
//! | `FillConvexGradient`, `FillConvexImage` | `u16` handle, `u8` aa |
//! | `Stroke` | color, `f32` width, `u8` aa, `u8` cap, `u8` join |
//! | `LinearGradient` | `f32 ×4` (start, end), color ×2 |
//! | `BoxGradient` | `f32 ×6` (x, y, w, h, r, feather), color ×2 |
//! | `RadialGradient` | `f32 ×4` (center, inner r, outer r), color ×2 |
//! | `ImagePattern` | `f32 ×5` (center, size, angle), `u16` image, `f32` alpha |
//! | `ApplyTransform` | `f32 ×6` (2x3 affine matrix) |
//! | `BeginClip` | `u8` rule |
//! | `TextStatic` | `u16` font id, `f32` font size, `u32` alignment, color, `f32 ×2` anchor, `u32` byte length, UTF-8 bytes |
//! | `TextBoxStatic` | as `TextStatic` with `f32` break width before the length |
//! | `TextDynamic` | `u16` font id, `f32` font size, `u32` alignment, color, `f32 ×2` anchor, `u32` string id |
//!
//! Every record's total length is derivable from its tag; text records
//! additionally carry their byte length at a fixed offset so a reader can
//! skip the inline content without interpreting it.

/// Tag identifying one recorded command.
///
/// The numeric values are part of the stream format; new tags may be added
/// at the end but existing values must never be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandTag {
    // Path construction
    BeginPath = 0,
    ClosePath = 1,
    MoveTo = 2,
    LineTo = 3,
    BezierTo = 4,
    ArcTo = 5,
    Rect = 6,
    RoundedRect = 7,
    RoundedRectVarying = 8,
    Circle = 9,

    // Path consumption
    FillConvexColor = 10,
    FillConvexGradient = 11,
    FillConvexImage = 12,
    FillConcaveColor = 13,
    Stroke = 14,

    // Resource declarations
    LinearGradient = 15,
    BoxGradient = 16,
    RadialGradient = 17,
    ImagePattern = 18,

    // State and transforms
    PushState = 19,
    PopState = 20,
    Scissor = 21,
    IntersectScissor = 22,
    Rotate = 23,
    Translate = 24,
    Scale = 25,
    ApplyTransform = 26,

    // Clip regions
    BeginClip = 27,
    EndClip = 28,
    ResetClip = 29,

    // Text
    TextStatic = 30,
    TextBoxStatic = 31,
    #[cfg(feature = "dynamic-text")]
    TextDynamic = 32,
}

impl CommandTag {
    /// Decode a tag byte read from a stream.
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::BeginPath,
            1 => Self::ClosePath,
            2 => Self::MoveTo,
            3 => Self::LineTo,
            4 => Self::BezierTo,
            5 => Self::ArcTo,
            6 => Self::Rect,
            7 => Self::RoundedRect,
            8 => Self::RoundedRectVarying,
            9 => Self::Circle,
            10 => Self::FillConvexColor,
            11 => Self::FillConvexGradient,
            12 => Self::FillConvexImage,
            13 => Self::FillConcaveColor,
            14 => Self::Stroke,
            15 => Self::LinearGradient,
            16 => Self::BoxGradient,
            17 => Self::RadialGradient,
            18 => Self::ImagePattern,
            19 => Self::PushState,
            20 => Self::PopState,
            21 => Self::Scissor,
            22 => Self::IntersectScissor,
            23 => Self::Rotate,
            24 => Self::Translate,
            25 => Self::Scale,
            26 => Self::ApplyTransform,
            27 => Self::BeginClip,
            28 => Self::EndClip,
            29 => Self::ResetClip,
            30 => Self::TextStatic,
            31 => Self::TextBoxStatic,
            #[cfg(feature = "dynamic-text")]
            32 => Self::TextDynamic,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_values_round_trip() {
        let tags = [
            CommandTag::BeginPath,
            CommandTag::ClosePath,
            CommandTag::MoveTo,
            CommandTag::LineTo,
            CommandTag::BezierTo,
            CommandTag::ArcTo,
            CommandTag::Rect,
            CommandTag::RoundedRect,
            CommandTag::RoundedRectVarying,
            CommandTag::Circle,
            CommandTag::FillConvexColor,
            CommandTag::FillConvexGradient,
            CommandTag::FillConvexImage,
            CommandTag::FillConcaveColor,
            CommandTag::Stroke,
            CommandTag::LinearGradient,
            CommandTag::BoxGradient,
            CommandTag::RadialGradient,
            CommandTag::ImagePattern,
            CommandTag::PushState,
            CommandTag::PopState,
            CommandTag::Scissor,
            CommandTag::IntersectScissor,
            CommandTag::Rotate,
            CommandTag::Translate,
            CommandTag::Scale,
            CommandTag::ApplyTransform,
            CommandTag::BeginClip,
            CommandTag::EndClip,
            CommandTag::ResetClip,
            CommandTag::TextStatic,
            CommandTag::TextBoxStatic,
        ];
        for tag in tags {
            assert_eq!(CommandTag::from_u8(tag as u8), Some(tag));
        }
        assert_eq!(CommandTag::from_u8(0xFF), None);
    }

    #[cfg(feature = "dynamic-text")]
    #[test]
    fn test_dynamic_text_tag() {
        assert_eq!(CommandTag::from_u8(32), Some(CommandTag::TextDynamic));
    }
}
