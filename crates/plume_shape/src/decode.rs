//! Sequential command-stream decoding.
//!
//! [`CommandReader`] walks a finished stream record by record, borrowing
//! text content straight out of the buffer. Decoding is the mirror image of
//! the layouts documented in [`crate::command`]; a stream recorded by
//! [`crate::shape::Shape`] always decodes to the exact call sequence that
//! produced it.
//!
//! Decode errors are unrecoverable for the rest of the stream: past a
//! truncated or unrecognized record there is no reliable record boundary, so
//! the reader yields the error once and then terminates.

use plume_core::{
    Alignment, ClipRule, Color, Font, GradientHandle, ImageHandle, ImagePatternHandle, LineCap,
    LineJoin,
};
#[cfg(feature = "dynamic-text")]
use plume_core::StringId;
use thiserror::Error;

use crate::command::CommandTag;
use crate::wire::ByteReader;

/// Errors reading a command stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The stream ends in the middle of a record
    #[error("unexpected end of stream at byte {offset}")]
    UnexpectedEof { offset: usize },

    /// The tag byte does not name a known command
    #[error("unknown command tag {tag:#04x} at byte {offset}")]
    UnknownTag { tag: u8, offset: usize },

    /// An enum byte (line cap, line join, clip rule) is out of range
    #[error("invalid {what} value {value} at byte {offset}")]
    InvalidValue {
        what: &'static str,
        value: u8,
        offset: usize,
    },

    /// Inline text content is not valid UTF-8
    #[error("text record at byte {offset} is not valid UTF-8")]
    InvalidText { offset: usize },
}

/// One decoded record, borrowing inline content from the stream.
#[derive(Clone, Debug, PartialEq)]
pub enum Command<'a> {
    // Path construction
    BeginPath,
    ClosePath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    BezierTo { c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32 },
    ArcTo { x1: f32, y1: f32, x2: f32, y2: f32, radius: f32 },
    Rect { x: f32, y: f32, w: f32, h: f32 },
    RoundedRect { x: f32, y: f32, w: f32, h: f32, r: f32 },
    RoundedRectVarying {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        r_top_left: f32,
        r_bottom_left: f32,
        r_bottom_right: f32,
        r_top_right: f32,
    },
    Circle { cx: f32, cy: f32, radius: f32 },

    // Path consumption
    FillConvexColor { color: Color, aa: bool },
    FillConvexGradient { gradient: GradientHandle, aa: bool },
    FillConvexImage { pattern: ImagePatternHandle, aa: bool },
    FillConcaveColor { color: Color, aa: bool },
    Stroke { color: Color, width: f32, aa: bool, cap: LineCap, join: LineJoin },

    // Resource declarations
    LinearGradient { sx: f32, sy: f32, ex: f32, ey: f32, inner: Color, outer: Color },
    BoxGradient {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        r: f32,
        f: f32,
        inner: Color,
        outer: Color,
    },
    RadialGradient {
        cx: f32,
        cy: f32,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color,
        outer: Color,
    },
    ImagePattern {
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        angle: f32,
        image: ImageHandle,
        alpha: f32,
    },

    // State and transforms
    PushState,
    PopState,
    Scissor { x: f32, y: f32, w: f32, h: f32 },
    IntersectScissor { x: f32, y: f32, w: f32, h: f32 },
    Rotate { angle: f32 },
    Translate { x: f32, y: f32 },
    Scale { sx: f32, sy: f32 },
    ApplyTransform { matrix: [f32; 6] },

    // Clip regions
    BeginClip { rule: ClipRule },
    EndClip,
    ResetClip,

    // Text
    TextStatic {
        font: Font,
        alignment: Alignment,
        color: Color,
        x: f32,
        y: f32,
        text: &'a str,
    },
    TextBoxStatic {
        font: Font,
        alignment: Alignment,
        color: Color,
        x: f32,
        y: f32,
        break_width: f32,
        text: &'a str,
    },
    #[cfg(feature = "dynamic-text")]
    TextDynamic {
        font: Font,
        alignment: Alignment,
        color: Color,
        x: f32,
        y: f32,
        id: StringId,
    },
}

/// Iterator over the records of a finished stream.
///
/// Yields `Err` at most once; afterwards the iterator is exhausted.
#[derive(Clone, Debug)]
pub struct CommandReader<'a> {
    reader: ByteReader<'a>,
    failed: bool,
}

impl<'a> CommandReader<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self {
            reader: ByteReader::new(stream),
            failed: false,
        }
    }

    /// Byte offset of the next unread record.
    pub fn offset(&self) -> usize {
        self.reader.pos()
    }

    fn text_header(r: &mut ByteReader<'a>) -> Result<(Font, Alignment, Color, f32, f32), DecodeError> {
        let id = r.u16()?;
        let size = r.f32()?;
        let font = Font { id, size };
        let alignment = Alignment::from_bits(r.u32()?);
        let color = r.color()?;
        let [x, y] = r.f32s()?;
        Ok((font, alignment, color, x, y))
    }

    fn text_content(r: &mut ByteReader<'a>) -> Result<&'a str, DecodeError> {
        let len = r.u32()? as usize;
        let at = r.pos();
        let bytes = r.take(len)?;
        std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidText { offset: at })
    }

    fn decode_record(r: &mut ByteReader<'a>) -> Result<Command<'a>, DecodeError> {
        let tag_offset = r.pos();
        let tag_byte = r.u8()?;
        let tag = CommandTag::from_u8(tag_byte).ok_or(DecodeError::UnknownTag {
            tag: tag_byte,
            offset: tag_offset,
        })?;

        let cmd = match tag {
            CommandTag::BeginPath => Command::BeginPath,
            CommandTag::ClosePath => Command::ClosePath,
            CommandTag::MoveTo => {
                let [x, y] = r.f32s()?;
                Command::MoveTo { x, y }
            }
            CommandTag::LineTo => {
                let [x, y] = r.f32s()?;
                Command::LineTo { x, y }
            }
            CommandTag::BezierTo => {
                let [c1x, c1y, c2x, c2y, x, y] = r.f32s()?;
                Command::BezierTo { c1x, c1y, c2x, c2y, x, y }
            }
            CommandTag::ArcTo => {
                let [x1, y1, x2, y2, radius] = r.f32s()?;
                Command::ArcTo { x1, y1, x2, y2, radius }
            }
            CommandTag::Rect => {
                let [x, y, w, h] = r.f32s()?;
                Command::Rect { x, y, w, h }
            }
            CommandTag::RoundedRect => {
                let [x, y, w, h, radius] = r.f32s()?;
                Command::RoundedRect { x, y, w, h, r: radius }
            }
            CommandTag::RoundedRectVarying => {
                let [x, y, w, h, r_top_left, r_bottom_left, r_bottom_right, r_top_right] =
                    r.f32s()?;
                Command::RoundedRectVarying {
                    x,
                    y,
                    w,
                    h,
                    r_top_left,
                    r_bottom_left,
                    r_bottom_right,
                    r_top_right,
                }
            }
            CommandTag::Circle => {
                let [cx, cy, radius] = r.f32s()?;
                Command::Circle { cx, cy, radius }
            }
            CommandTag::FillConvexColor => {
                let color = r.color()?;
                let aa = r.bool()?;
                Command::FillConvexColor { color, aa }
            }
            CommandTag::FillConvexGradient => {
                let gradient = GradientHandle(r.u16()?);
                let aa = r.bool()?;
                Command::FillConvexGradient { gradient, aa }
            }
            CommandTag::FillConvexImage => {
                let pattern = ImagePatternHandle(r.u16()?);
                let aa = r.bool()?;
                Command::FillConvexImage { pattern, aa }
            }
            CommandTag::FillConcaveColor => {
                let color = r.color()?;
                let aa = r.bool()?;
                Command::FillConcaveColor { color, aa }
            }
            CommandTag::Stroke => {
                let color = r.color()?;
                let width = r.f32()?;
                let aa = r.bool()?;
                let at = r.pos();
                let cap_byte = r.u8()?;
                let cap = LineCap::from_u8(cap_byte).ok_or(DecodeError::InvalidValue {
                    what: "line cap",
                    value: cap_byte,
                    offset: at,
                })?;
                let at = r.pos();
                let join_byte = r.u8()?;
                let join = LineJoin::from_u8(join_byte).ok_or(DecodeError::InvalidValue {
                    what: "line join",
                    value: join_byte,
                    offset: at,
                })?;
                Command::Stroke { color, width, aa, cap, join }
            }
            CommandTag::LinearGradient => {
                let [sx, sy, ex, ey] = r.f32s()?;
                let inner = r.color()?;
                let outer = r.color()?;
                Command::LinearGradient { sx, sy, ex, ey, inner, outer }
            }
            CommandTag::BoxGradient => {
                let [x, y, w, h, radius, feather] = r.f32s()?;
                let inner = r.color()?;
                let outer = r.color()?;
                Command::BoxGradient { x, y, w, h, r: radius, f: feather, inner, outer }
            }
            CommandTag::RadialGradient => {
                let [cx, cy, inner_radius, outer_radius] = r.f32s()?;
                let inner = r.color()?;
                let outer = r.color()?;
                Command::RadialGradient { cx, cy, inner_radius, outer_radius, inner, outer }
            }
            CommandTag::ImagePattern => {
                let [cx, cy, w, h, angle] = r.f32s()?;
                let image = ImageHandle(r.u16()?);
                let alpha = r.f32()?;
                Command::ImagePattern { cx, cy, w, h, angle, image, alpha }
            }
            CommandTag::PushState => Command::PushState,
            CommandTag::PopState => Command::PopState,
            CommandTag::Scissor => {
                let [x, y, w, h] = r.f32s()?;
                Command::Scissor { x, y, w, h }
            }
            CommandTag::IntersectScissor => {
                let [x, y, w, h] = r.f32s()?;
                Command::IntersectScissor { x, y, w, h }
            }
            CommandTag::Rotate => {
                let angle = r.f32()?;
                Command::Rotate { angle }
            }
            CommandTag::Translate => {
                let [x, y] = r.f32s()?;
                Command::Translate { x, y }
            }
            CommandTag::Scale => {
                let [sx, sy] = r.f32s()?;
                Command::Scale { sx, sy }
            }
            CommandTag::ApplyTransform => {
                let matrix = r.f32s()?;
                Command::ApplyTransform { matrix }
            }
            CommandTag::BeginClip => {
                let at = r.pos();
                let rule_byte = r.u8()?;
                let rule = ClipRule::from_u8(rule_byte).ok_or(DecodeError::InvalidValue {
                    what: "clip rule",
                    value: rule_byte,
                    offset: at,
                })?;
                Command::BeginClip { rule }
            }
            CommandTag::EndClip => Command::EndClip,
            CommandTag::ResetClip => Command::ResetClip,
            CommandTag::TextStatic => {
                let (font, alignment, color, x, y) = Self::text_header(r)?;
                let text = Self::text_content(r)?;
                Command::TextStatic { font, alignment, color, x, y, text }
            }
            CommandTag::TextBoxStatic => {
                let (font, alignment, color, x, y) = Self::text_header(r)?;
                let break_width = r.f32()?;
                let text = Self::text_content(r)?;
                Command::TextBoxStatic { font, alignment, color, x, y, break_width, text }
            }
            #[cfg(feature = "dynamic-text")]
            CommandTag::TextDynamic => {
                let (font, alignment, color, x, y) = Self::text_header(r)?;
                let id = StringId(r.u32()?);
                Command::TextDynamic { font, alignment, color, x, y, id }
            }
        };
        Ok(cmd)
    }
}

impl<'a> Iterator for CommandReader<'a> {
    type Item = Result<Command<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_empty() {
            return None;
        }
        let result = Self::decode_record(&mut self.reader);
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}
