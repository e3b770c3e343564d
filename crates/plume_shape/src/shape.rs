//! The shape recorder.
//!
//! [`Shape`] turns drawing calls into tagged records appended to a
//! caller-owned byte buffer. Nothing is rasterized here; a consumer walks the
//! finished stream later (see [`crate::decode`]). Recording is strictly
//! append-only: no call reads the stream back, and no record is ever
//! rewritten or reordered once appended.
//!
//! Call-sequencing rules (balanced `push_state`/`pop_state`, balanced
//! `begin_clip`/`end_clip`, path construction before fills and strokes) are
//! the caller's obligation and are not checked while recording;
//! [`crate::validate::audit`] can check a finished stream.

use plume_core::{
    Alignment, ClipRule, Color, Font, GradientHandle, ImageHandle, ImagePatternHandle, LineCap,
    LineJoin,
};
#[cfg(feature = "dynamic-text")]
use plume_core::StringId;

use crate::command::CommandTag;
use crate::flags::ShapeFlags;
use crate::wire;

/// Records drawing calls into a command stream.
///
/// The backing buffer is borrowed, not owned: the recorder appends to it and
/// [`reset`](Shape::reset) truncates it, but allocation and lifetime belong
/// to the caller. Gradient and image-pattern declarations return handles
/// equal to their declaration index within this stream.
///
/// ```
/// use plume_core::Color;
/// use plume_shape::{Shape, ShapeFlags};
///
/// let mut buf = Vec::new();
/// let mut shape = Shape::new(&mut buf);
/// shape.begin_path();
/// shape.move_to(0.0, 0.0);
/// shape.line_to(10.0, 0.0);
/// shape.close_path();
/// shape.fill_convex_color(Color::RED, true);
/// assert!(!shape.flags().contains(ShapeFlags::HAS_TEXT));
/// ```
#[derive(Debug)]
pub struct Shape<'a> {
    stream: &'a mut Vec<u8>,
    num_gradients: u16,
    num_image_patterns: u16,
    flags: ShapeFlags,
}

impl<'a> Shape<'a> {
    /// Create a recorder bound to `stream`.
    ///
    /// The buffer is used as-is; recording appends after any existing
    /// content, which lets a caller resume a previously recorded stream.
    pub fn new(stream: &'a mut Vec<u8>) -> Self {
        Self {
            stream,
            num_gradients: 0,
            num_image_patterns: 0,
            flags: ShapeFlags::empty(),
        }
    }

    /// Bytes recorded so far.
    pub fn stream_len(&self) -> usize {
        self.stream.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }

    /// Aggregate flags accumulated so far.
    pub fn flags(&self) -> ShapeFlags {
        self.flags
    }

    /// Number of gradients declared so far.
    pub fn num_gradients(&self) -> u16 {
        self.num_gradients
    }

    /// Number of image patterns declared so far.
    pub fn num_image_patterns(&self) -> u16 {
        self.num_image_patterns
    }

    /// Truncate the stream and zero all counters and flags.
    ///
    /// This is the only operation that removes recorded content, and it
    /// invalidates every handle previously returned by this recorder.
    pub fn reset(&mut self) {
        tracing::trace!(bytes = self.stream.len(), "resetting shape stream");
        self.stream.clear();
        self.num_gradients = 0;
        self.num_image_patterns = 0;
        self.flags = ShapeFlags::empty();
    }

    fn tag(&mut self, tag: CommandTag) {
        wire::put_u8(self.stream, tag as u8);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Path construction
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a new path context, discarding any current path on replay.
    pub fn begin_path(&mut self) {
        self.tag(CommandTag::BeginPath);
    }

    /// Set the current point without drawing.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.tag(CommandTag::MoveTo);
        wire::put_f32s(self.stream, &[x, y]);
    }

    /// Straight segment from the current point.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.tag(CommandTag::LineTo);
        wire::put_f32s(self.stream, &[x, y]);
    }

    /// Cubic Bézier segment with control points `(c1x, c1y)` and `(c2x, c2y)`.
    pub fn bezier_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.tag(CommandTag::BezierTo);
        wire::put_f32s(self.stream, &[c1x, c1y, c2x, c2y, x, y]);
    }

    /// Arc tangent to the lines `current→(x1, y1)` and `(x1, y1)→(x2, y2)`.
    ///
    /// A zero radius degenerates to a straight line on replay; the radius is
    /// recorded verbatim either way.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        self.tag(CommandTag::ArcTo);
        wire::put_f32s(self.stream, &[x1, y1, x2, y2, radius]);
    }

    /// Axis-aligned rectangle subpath.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.tag(CommandTag::Rect);
        wire::put_f32s(self.stream, &[x, y, w, h]);
    }

    /// Rounded rectangle subpath with a uniform corner radius.
    pub fn rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, r: f32) {
        self.tag(CommandTag::RoundedRect);
        wire::put_f32s(self.stream, &[x, y, w, h, r]);
    }

    /// Rounded rectangle subpath with independent corner radii.
    ///
    /// Radii are recorded in the order top-left, bottom-left, bottom-right,
    /// top-right; consumers must read them in the same order.
    #[allow(clippy::too_many_arguments)]
    pub fn rounded_rect_varying(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        r_top_left: f32,
        r_bottom_left: f32,
        r_bottom_right: f32,
        r_top_right: f32,
    ) {
        self.tag(CommandTag::RoundedRectVarying);
        wire::put_f32s(
            self.stream,
            &[x, y, w, h, r_top_left, r_bottom_left, r_bottom_right, r_top_right],
        );
    }

    /// Circle subpath.
    pub fn circle(&mut self, cx: f32, cy: f32, radius: f32) {
        self.tag(CommandTag::Circle);
        wire::put_f32s(self.stream, &[cx, cy, radius]);
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) {
        self.tag(CommandTag::ClosePath);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Path consumption
    // ─────────────────────────────────────────────────────────────────────────

    /// Fill the current path, assumed convex, with a solid color.
    pub fn fill_convex_color(&mut self, color: Color, aa: bool) {
        self.tag(CommandTag::FillConvexColor);
        wire::put_color(self.stream, color);
        wire::put_bool(self.stream, aa);
    }

    /// Fill the current path, assumed convex, with a previously declared
    /// gradient.
    ///
    /// The handle must come from a declaration already recorded into this
    /// stream; the recorder does not check it (see
    /// [`crate::validate::audit`]).
    pub fn fill_convex_gradient(&mut self, gradient: GradientHandle, aa: bool) {
        self.tag(CommandTag::FillConvexGradient);
        wire::put_u16(self.stream, gradient.0);
        wire::put_bool(self.stream, aa);
    }

    /// Fill the current path, assumed convex, with a previously declared
    /// image pattern.
    pub fn fill_convex_image(&mut self, pattern: ImagePatternHandle, aa: bool) {
        self.tag(CommandTag::FillConvexImage);
        wire::put_u16(self.stream, pattern.0);
        wire::put_bool(self.stream, aa);
    }

    /// Fill the current path with a solid color, tolerating concavity.
    ///
    /// Concave fills support solid colors only; this restriction is part of
    /// the recording contract, not an encoder limitation.
    pub fn fill_concave_color(&mut self, color: Color, aa: bool) {
        self.tag(CommandTag::FillConcaveColor);
        wire::put_color(self.stream, color);
        wire::put_bool(self.stream, aa);
    }

    /// Stroke the current path.
    pub fn stroke(&mut self, color: Color, width: f32, aa: bool, cap: LineCap, join: LineJoin) {
        self.tag(CommandTag::Stroke);
        wire::put_color(self.stream, color);
        wire::put_f32(self.stream, width);
        wire::put_bool(self.stream, aa);
        wire::put_u8(self.stream, cap as u8);
        wire::put_u8(self.stream, join as u8);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State and transforms
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the replay-side style, transform, and clip state.
    ///
    /// Must be balanced by a matching [`pop_state`](Shape::pop_state) before
    /// the end of the stream.
    pub fn push_state(&mut self) {
        self.tag(CommandTag::PushState);
    }

    /// Restore the most recently saved replay-side state.
    pub fn pop_state(&mut self) {
        self.tag(CommandTag::PopState);
    }

    /// Replace the scissor rectangle.
    pub fn scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.tag(CommandTag::Scissor);
        wire::put_f32s(self.stream, &[x, y, w, h]);
    }

    /// Intersect the scissor rectangle with the given rectangle.
    ///
    /// On replay this combines with any existing scissor by rectangle
    /// intersection rather than replacing it.
    pub fn intersect_scissor(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.tag(CommandTag::IntersectScissor);
        wire::put_f32s(self.stream, &[x, y, w, h]);
    }

    /// Rotate by `angle` radians.
    ///
    /// Like all transform commands, this post-multiplies the current
    /// transform on replay; recording order is call order.
    pub fn rotate(&mut self, angle: f32) {
        self.tag(CommandTag::Rotate);
        wire::put_f32(self.stream, angle);
    }

    /// Translate by `(x, y)`.
    pub fn translate(&mut self, x: f32, y: f32) {
        self.tag(CommandTag::Translate);
        wire::put_f32s(self.stream, &[x, y]);
    }

    /// Scale by `(sx, sy)`.
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.tag(CommandTag::Scale);
        wire::put_f32s(self.stream, &[sx, sy]);
    }

    /// Post-multiply the current transform with an arbitrary 2x3 affine
    /// matrix `[a, b, c, d, tx, ty]`.
    pub fn apply_transform(&mut self, matrix: &[f32; 6]) {
        self.tag(CommandTag::ApplyTransform);
        wire::put_f32s(self.stream, matrix);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clip regions
    // ─────────────────────────────────────────────────────────────────────────

    /// Start defining a clip region combined with the active clip by `rule`.
    ///
    /// Must be balanced by a matching [`end_clip`](Shape::end_clip). Pairs
    /// may nest arbitrarily.
    pub fn begin_clip(&mut self, rule: ClipRule) {
        self.tag(CommandTag::BeginClip);
        wire::put_u8(self.stream, rule as u8);
    }

    /// Finish the clip region started by the matching
    /// [`begin_clip`](Shape::begin_clip).
    pub fn end_clip(&mut self) {
        self.tag(CommandTag::EndClip);
    }

    /// Clear any active clip, independent of the push/pop state stack.
    pub fn reset_clip(&mut self) {
        self.tag(CommandTag::ResetClip);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Gradient and image-pattern declarations
    // ─────────────────────────────────────────────────────────────────────────

    fn next_gradient(&mut self) -> GradientHandle {
        let handle = GradientHandle(self.num_gradients);
        self.num_gradients += 1;
        self.flags.insert(ShapeFlags::HAS_GRADIENTS);
        handle
    }

    /// Declare a linear gradient from `(sx, sy)` to `(ex, ey)`.
    pub fn linear_gradient(
        &mut self,
        sx: f32,
        sy: f32,
        ex: f32,
        ey: f32,
        inner: Color,
        outer: Color,
    ) -> GradientHandle {
        self.tag(CommandTag::LinearGradient);
        wire::put_f32s(self.stream, &[sx, sy, ex, ey]);
        wire::put_color(self.stream, inner);
        wire::put_color(self.stream, outer);
        self.next_gradient()
    }

    /// Declare a box gradient: a rounded rectangle at `(x, y, w, h)` with
    /// corner radius `r` and feather `f` controlling the falloff width.
    #[allow(clippy::too_many_arguments)]
    pub fn box_gradient(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        r: f32,
        f: f32,
        inner: Color,
        outer: Color,
    ) -> GradientHandle {
        self.tag(CommandTag::BoxGradient);
        wire::put_f32s(self.stream, &[x, y, w, h, r, f]);
        wire::put_color(self.stream, inner);
        wire::put_color(self.stream, outer);
        self.next_gradient()
    }

    /// Declare a radial gradient centered at `(cx, cy)` fading between the
    /// inner and outer radius.
    pub fn radial_gradient(
        &mut self,
        cx: f32,
        cy: f32,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color,
        outer: Color,
    ) -> GradientHandle {
        self.tag(CommandTag::RadialGradient);
        wire::put_f32s(self.stream, &[cx, cy, inner_radius, outer_radius]);
        wire::put_color(self.stream, inner);
        wire::put_color(self.stream, outer);
        self.next_gradient()
    }

    /// Declare an image pattern: `image` placed in the rectangle centered at
    /// `(cx, cy)` of size `(w, h)`, rotated by `angle` radians, with `alpha`
    /// applied on top of the image's own alpha.
    #[allow(clippy::too_many_arguments)]
    pub fn image_pattern(
        &mut self,
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        angle: f32,
        image: ImageHandle,
        alpha: f32,
    ) -> ImagePatternHandle {
        self.tag(CommandTag::ImagePattern);
        wire::put_f32s(self.stream, &[cx, cy, w, h, angle]);
        wire::put_u16(self.stream, image.0);
        wire::put_f32(self.stream, alpha);
        let handle = ImagePatternHandle(self.num_image_patterns);
        self.num_image_patterns += 1;
        self.flags.insert(ShapeFlags::HAS_IMAGES);
        handle
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text
    // ─────────────────────────────────────────────────────────────────────────

    fn text_header(&mut self, font: Font, alignment: Alignment, color: Color, x: f32, y: f32) {
        wire::put_u16(self.stream, font.id);
        wire::put_f32(self.stream, font.size);
        wire::put_u32(self.stream, alignment.bits());
        wire::put_color(self.stream, color);
        wire::put_f32s(self.stream, &[x, y]);
    }

    /// Record a single-line text run anchored at `(x, y)`.
    ///
    /// The text bytes are copied into the stream; the original string is not
    /// retained.
    pub fn text(
        &mut self,
        font: Font,
        alignment: Alignment,
        color: Color,
        x: f32,
        y: f32,
        text: &str,
    ) {
        self.tag(CommandTag::TextStatic);
        self.text_header(font, alignment, color, x, y);
        wire::put_u32(self.stream, text.len() as u32);
        wire::put_bytes(self.stream, text.as_bytes());
        self.flags.insert(ShapeFlags::HAS_TEXT);
    }

    /// Record a text block anchored at `(x, y)` and line-broken at
    /// `break_width`.
    #[allow(clippy::too_many_arguments)]
    pub fn text_box(
        &mut self,
        font: Font,
        alignment: Alignment,
        color: Color,
        x: f32,
        y: f32,
        break_width: f32,
        text: &str,
    ) {
        self.tag(CommandTag::TextBoxStatic);
        self.text_header(font, alignment, color, x, y);
        wire::put_f32(self.stream, break_width);
        wire::put_u32(self.stream, text.len() as u32);
        wire::put_bytes(self.stream, text.as_bytes());
        self.flags.insert(ShapeFlags::HAS_TEXT);
    }

    /// Record a text run whose content is resolved at replay time from an
    /// external string table (see [`crate::strings`]).
    ///
    /// Only the id is recorded; the recorder never reads the string content.
    #[cfg(feature = "dynamic-text")]
    pub fn text_dynamic(
        &mut self,
        font: Font,
        alignment: Alignment,
        color: Color,
        x: f32,
        y: f32,
        id: StringId,
    ) {
        self.tag(CommandTag::TextDynamic);
        self.text_header(font, alignment, color, x, y);
        wire::put_u32(self.stream, id.0);
        self.flags.insert(ShapeFlags::HAS_TEXT);
        self.flags.insert(ShapeFlags::HAS_DYNAMIC_TEXT);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Optimizer policy
    // ─────────────────────────────────────────────────────────────────────────

    /// Declare that command order within this stream carries no semantic
    /// dependency, so a consumer may reorder commands when batching.
    ///
    /// This is a pure policy hint; the recorder does not verify the claim.
    pub fn allow_reordering(&mut self) {
        self.flags.insert(ShapeFlags::ALLOW_COMMAND_REORDERING);
    }

    /// Declare that the fully recorded shape's rasterized output may be
    /// memoized by content hash.
    ///
    /// This is a pure policy hint; the recorder does not verify the claim.
    pub fn enable_caching(&mut self) {
        self.flags.insert(ShapeFlags::ENABLE_CACHING);
    }
}
