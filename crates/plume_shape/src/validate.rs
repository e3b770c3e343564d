//! Fail-soft protocol auditing for finished streams.
//!
//! The recorder never checks call sequencing, so imbalance and bad handles
//! only become visible when a stream is walked. [`audit`] performs that walk
//! once, up front, and reports every finding instead of stopping at the
//! first: a consumer can use the report to skip degenerate records rather
//! than crash, and a test suite can assert a stream is clean.

use smallvec::SmallVec;
use tracing::warn;

use plume_core::ClipRule;

use crate::decode::{Command, CommandReader, DecodeError};

/// One protocol violation found while auditing a stream
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    /// `pop_state` with no open `push_state`
    StateUnderflow { offset: usize },
    /// `push_state` calls left open at end of stream
    StateUnbalanced { open: usize },
    /// `end_clip` with no open `begin_clip`
    ClipUnderflow { offset: usize },
    /// `begin_clip` calls left open at end of stream
    ClipUnbalanced { open: usize },
    /// Fill command with no preceding path geometry in the current path
    FillWithoutPath { offset: usize },
    /// Stroke command with no preceding path geometry in the current path
    StrokeWithoutPath { offset: usize },
    /// Gradient fill referencing a gradient not yet declared at that point
    GradientOutOfRange { handle: u16, declared: u16, offset: usize },
    /// Image fill referencing a pattern not yet declared at that point
    ImagePatternOutOfRange { handle: u16, declared: u16, offset: usize },
    /// The stream could not be decoded past this point
    Malformed { error: DecodeError },
}

/// Audit result: record count plus every violation found
#[derive(Clone, Debug, Default)]
pub struct StreamAudit {
    /// Records successfully decoded
    pub records: usize,
    /// Violations in stream order (imbalance findings last)
    pub violations: Vec<Violation>,
}

impl StreamAudit {
    /// True if the stream decoded fully and honored the protocol.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Walk `stream` and report protocol violations without failing hard.
///
/// A malformed record ends the walk (record boundaries are unknowable past
/// it) but still produces a report for everything before it.
pub fn audit(stream: &[u8]) -> StreamAudit {
    let mut out = StreamAudit::default();
    let mut state_depth: usize = 0;
    let mut clip_stack: SmallVec<[ClipRule; 8]> = SmallVec::new();
    let mut path_begun = false;
    let mut path_has_geometry = false;
    let mut gradients_declared: u16 = 0;
    let mut patterns_declared: u16 = 0;

    let mut reader = CommandReader::new(stream);
    loop {
        let offset = reader.offset();
        let cmd = match reader.next() {
            None => break,
            Some(Err(error)) => {
                note(&mut out, Violation::Malformed { error });
                break;
            }
            Some(Ok(cmd)) => cmd,
        };
        out.records += 1;

        let fillable = path_begun && path_has_geometry;
        match cmd {
            Command::BeginPath => {
                path_begun = true;
                path_has_geometry = false;
            }
            Command::MoveTo { .. }
            | Command::LineTo { .. }
            | Command::BezierTo { .. }
            | Command::ArcTo { .. }
            | Command::Rect { .. }
            | Command::RoundedRect { .. }
            | Command::RoundedRectVarying { .. }
            | Command::Circle { .. } => path_has_geometry = true,

            Command::FillConvexColor { .. } | Command::FillConcaveColor { .. } => {
                if !fillable {
                    note(&mut out, Violation::FillWithoutPath { offset });
                }
            }
            Command::FillConvexGradient { gradient, .. } => {
                if !fillable {
                    note(&mut out, Violation::FillWithoutPath { offset });
                }
                if gradient.0 >= gradients_declared {
                    note(
                        &mut out,
                        Violation::GradientOutOfRange {
                            handle: gradient.0,
                            declared: gradients_declared,
                            offset,
                        },
                    );
                }
            }
            Command::FillConvexImage { pattern, .. } => {
                if !fillable {
                    note(&mut out, Violation::FillWithoutPath { offset });
                }
                if pattern.0 >= patterns_declared {
                    note(
                        &mut out,
                        Violation::ImagePatternOutOfRange {
                            handle: pattern.0,
                            declared: patterns_declared,
                            offset,
                        },
                    );
                }
            }
            Command::Stroke { .. } => {
                if !fillable {
                    note(&mut out, Violation::StrokeWithoutPath { offset });
                }
            }

            Command::LinearGradient { .. }
            | Command::BoxGradient { .. }
            | Command::RadialGradient { .. } => gradients_declared += 1,
            Command::ImagePattern { .. } => patterns_declared += 1,

            Command::PushState => state_depth += 1,
            Command::PopState => {
                if state_depth == 0 {
                    note(&mut out, Violation::StateUnderflow { offset });
                } else {
                    state_depth -= 1;
                }
            }

            Command::BeginClip { rule } => clip_stack.push(rule),
            Command::EndClip => {
                if clip_stack.pop().is_none() {
                    note(&mut out, Violation::ClipUnderflow { offset });
                }
            }

            _ => {}
        }
    }

    if state_depth > 0 {
        note(&mut out, Violation::StateUnbalanced { open: state_depth });
    }
    if !clip_stack.is_empty() {
        note(&mut out, Violation::ClipUnbalanced { open: clip_stack.len() });
    }
    out
}

fn note(audit: &mut StreamAudit, violation: Violation) {
    warn!(?violation, "command stream violation");
    audit.violations.push(violation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use plume_core::{Color, GradientHandle, LineCap, LineJoin};

    #[test]
    fn test_balanced_stream_is_clean() {
        let mut buf = Vec::new();
        let mut shape = Shape::new(&mut buf);
        shape.push_state();
        shape.begin_clip(ClipRule::Intersect);
        shape.begin_path();
        shape.rect(0.0, 0.0, 10.0, 10.0);
        shape.fill_convex_color(Color::GREEN, true);
        shape.end_clip();
        shape.pop_state();

        let report = audit(&buf);
        assert!(report.is_clean(), "{:?}", report.violations);
        assert_eq!(report.records, 7);
    }

    #[test]
    fn test_unmatched_end_clip_is_underflow() {
        let mut buf = Vec::new();
        let mut shape = Shape::new(&mut buf);
        shape.end_clip();

        let report = audit(&buf);
        assert_eq!(report.violations, vec![Violation::ClipUnderflow { offset: 0 }]);
    }

    #[test]
    fn test_open_push_state_is_unbalanced() {
        let mut buf = Vec::new();
        let mut shape = Shape::new(&mut buf);
        shape.push_state();
        shape.push_state();
        shape.pop_state();

        let report = audit(&buf);
        assert_eq!(report.violations, vec![Violation::StateUnbalanced { open: 1 }]);
    }

    #[test]
    fn test_fill_before_any_path_is_flagged() {
        let mut buf = Vec::new();
        let mut shape = Shape::new(&mut buf);
        shape.fill_convex_color(Color::RED, true);
        shape.stroke(Color::RED, 1.0, true, LineCap::Butt, LineJoin::Miter);

        let report = audit(&buf);
        assert_eq!(report.violations.len(), 2);
        assert!(matches!(report.violations[0], Violation::FillWithoutPath { .. }));
        assert!(matches!(report.violations[1], Violation::StrokeWithoutPath { .. }));
    }

    #[test]
    fn test_begin_path_resets_geometry() {
        let mut buf = Vec::new();
        let mut shape = Shape::new(&mut buf);
        shape.begin_path();
        shape.circle(0.0, 0.0, 5.0);
        shape.fill_convex_color(Color::RED, true);
        shape.begin_path();
        shape.fill_convex_color(Color::RED, true);

        let report = audit(&buf);
        assert_eq!(report.violations.len(), 1);
        assert!(matches!(report.violations[0], Violation::FillWithoutPath { .. }));
    }

    #[test]
    fn test_gradient_handle_must_be_declared_first() {
        let mut buf = Vec::new();
        let mut shape = Shape::new(&mut buf);
        shape.begin_path();
        shape.rect(0.0, 0.0, 10.0, 10.0);
        // Handle forged before any declaration
        shape.fill_convex_gradient(GradientHandle(0), true);
        shape.linear_gradient(0.0, 0.0, 1.0, 1.0, Color::WHITE, Color::BLACK);
        shape.fill_convex_gradient(GradientHandle(0), true);

        let report = audit(&buf);
        assert_eq!(report.violations.len(), 1);
        assert!(matches!(
            report.violations[0],
            Violation::GradientOutOfRange { handle: 0, declared: 0, .. }
        ));
    }

    #[test]
    fn test_malformed_tail_is_reported() {
        let mut buf = Vec::new();
        let mut shape = Shape::new(&mut buf);
        shape.begin_path();
        buf.push(0xEE);

        let report = audit(&buf);
        assert_eq!(report.records, 1);
        assert_eq!(
            report.violations,
            vec![Violation::Malformed {
                error: DecodeError::UnknownTag { tag: 0xEE, offset: 1 }
            }]
        );
    }
}
