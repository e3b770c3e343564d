//! End-to-end recording and replay tests.

use plume_shape::{
    audit, Alignment, ClipRule, Color, Command, CommandReader, CommandTag, Font, GradientHandle,
    ImageHandle, LineCap, LineJoin, Shape, ShapeFlags, Violation,
};

fn decode(stream: &[u8]) -> Vec<Command<'_>> {
    CommandReader::new(stream)
        .collect::<Result<Vec<_>, _>>()
        .expect("stream decodes")
}

#[test]
fn fill_sequence_produces_six_records_in_call_order() {
    let mut buf = Vec::new();
    let mut shape = Shape::new(&mut buf);
    shape.begin_path();
    shape.move_to(0.0, 0.0);
    shape.line_to(10.0, 0.0);
    shape.line_to(10.0, 10.0);
    shape.close_path();
    shape.fill_convex_color(Color::RED, true);

    let cmds = decode(&buf);
    assert_eq!(cmds.len(), 6);
    assert_eq!(cmds[0], Command::BeginPath);
    assert_eq!(cmds[1], Command::MoveTo { x: 0.0, y: 0.0 });
    assert_eq!(cmds[2], Command::LineTo { x: 10.0, y: 0.0 });
    assert_eq!(cmds[3], Command::LineTo { x: 10.0, y: 10.0 });
    assert_eq!(cmds[4], Command::ClosePath);
    assert_eq!(cmds[5], Command::FillConvexColor { color: Color::RED, aa: true });
}

#[test]
fn varying_corner_radii_keep_their_order() {
    let mut buf = Vec::new();
    let mut shape = Shape::new(&mut buf);
    shape.rounded_rect_varying(0.0, 0.0, 100.0, 50.0, 1.0, 2.0, 3.0, 4.0);

    match decode(&buf).as_slice() {
        [Command::RoundedRectVarying {
            r_top_left,
            r_bottom_left,
            r_bottom_right,
            r_top_right,
            ..
        }] => {
            assert_eq!(
                (*r_top_left, *r_bottom_left, *r_bottom_right, *r_top_right),
                (1.0, 2.0, 3.0, 4.0)
            );
        }
        other => panic!("unexpected decode: {other:?}"),
    }
}

#[test]
fn declarations_drive_counters_and_flags() {
    let mut buf = Vec::new();
    let mut shape = Shape::new(&mut buf);
    let g0 = shape.linear_gradient(0.0, 0.0, 10.0, 0.0, Color::WHITE, Color::BLACK);
    let g1 = shape.radial_gradient(5.0, 5.0, 1.0, 8.0, Color::RED, Color::TRANSPARENT);
    shape.image_pattern(4.0, 4.0, 8.0, 8.0, 0.0, ImageHandle(7), 0.5);

    assert_eq!(g0, GradientHandle(0));
    assert_eq!(g1, GradientHandle(1));
    assert_eq!(shape.num_gradients(), 2);
    assert_eq!(shape.num_image_patterns(), 1);

    let flags = shape.flags();
    assert!(flags.contains(ShapeFlags::HAS_GRADIENTS));
    assert!(flags.contains(ShapeFlags::HAS_IMAGES));
    assert!(!flags.contains(ShapeFlags::HAS_TEXT));

    // Declaration records carry the parameters; declaration order is the
    // registry.
    let cmds = decode(&buf);
    assert!(matches!(cmds[0], Command::LinearGradient { .. }));
    assert!(matches!(cmds[1], Command::RadialGradient { .. }));
    assert!(matches!(
        cmds[2],
        Command::ImagePattern { image: ImageHandle(7), .. }
    ));
}

#[test]
fn identical_call_sequences_encode_byte_identically() {
    let record = |buf: &mut Vec<u8>| {
        let mut shape = Shape::new(buf);
        shape.push_state();
        shape.translate(3.0, 4.0);
        shape.rotate(0.25);
        shape.begin_path();
        shape.rounded_rect(0.0, 0.0, 20.0, 20.0, 5.0);
        let g = shape.box_gradient(0.0, 0.0, 20.0, 20.0, 5.0, 2.0, Color::CYAN, Color::BLUE);
        shape.fill_convex_gradient(g, true);
        shape.stroke(Color::BLACK, 1.5, true, LineCap::Square, LineJoin::Round);
        shape.pop_state();
        shape.text(
            Font::new(1, 16.0),
            Alignment::CENTER | Alignment::MIDDLE,
            Color::WHITE,
            10.0,
            10.0,
            "label",
        );
    };

    let mut a = Vec::new();
    let mut b = Vec::new();
    record(&mut a);
    record(&mut b);
    assert_eq!(a, b);
}

#[test]
fn transform_commands_record_parameters_verbatim() {
    let mut buf = Vec::new();
    let mut shape = Shape::new(&mut buf);
    shape.scissor(0.0, 0.0, 100.0, 100.0);
    shape.intersect_scissor(50.0, 50.0, 100.0, 100.0);
    shape.apply_transform(&[1.0, 0.0, 0.0, 1.0, 30.0, 40.0]);

    let cmds = decode(&buf);
    assert_eq!(cmds[0], Command::Scissor { x: 0.0, y: 0.0, w: 100.0, h: 100.0 });
    assert_eq!(
        cmds[1],
        Command::IntersectScissor { x: 50.0, y: 50.0, w: 100.0, h: 100.0 }
    );
    assert_eq!(
        cmds[2],
        Command::ApplyTransform { matrix: [1.0, 0.0, 0.0, 1.0, 30.0, 40.0] }
    );
}

#[test]
fn text_flags_distinguish_static_from_dynamic() {
    let mut buf = Vec::new();
    let mut shape = Shape::new(&mut buf);
    shape.text(
        Font::new(0, 14.0),
        Alignment::default(),
        Color::BLACK,
        0.0,
        0.0,
        "static only",
    );
    assert!(shape.flags().contains(ShapeFlags::HAS_TEXT));
    assert!(!shape.flags().contains(ShapeFlags::HAS_DYNAMIC_TEXT));
}

#[cfg(feature = "dynamic-text")]
#[test]
fn dynamic_text_round_trips_through_the_string_table() {
    use plume_shape::SharedStringTable;

    let table = SharedStringTable::new();
    let id = table.intern("score: 1200");

    let mut buf = Vec::new();
    let mut shape = Shape::new(&mut buf);
    shape.text_dynamic(
        Font::new(3, 18.0),
        Alignment::LEFT | Alignment::TOP,
        Color::YELLOW,
        2.0,
        2.0,
        id,
    );
    assert!(shape.flags().contains(ShapeFlags::HAS_TEXT));
    assert!(shape.flags().contains(ShapeFlags::HAS_DYNAMIC_TEXT));

    match decode(&buf).as_slice() {
        [Command::TextDynamic { id, .. }] => {
            assert_eq!(table.resolve(*id).as_deref(), Some("score: 1200"));
        }
        other => panic!("unexpected decode: {other:?}"),
    }
}

#[test]
fn reset_invalidates_everything() {
    let mut buf = Vec::new();
    let mut shape = Shape::new(&mut buf);
    shape.begin_path();
    shape.circle(5.0, 5.0, 5.0);
    shape.linear_gradient(0.0, 0.0, 1.0, 1.0, Color::WHITE, Color::BLACK);
    shape.allow_reordering();
    shape.reset();

    assert_eq!(shape.stream_len(), 0);
    assert_eq!(shape.num_gradients(), 0);
    assert_eq!(shape.num_image_patterns(), 0);
    assert!(shape.flags().is_empty());
    assert!(decode(&buf).is_empty());
}

#[test]
fn audit_flags_clip_imbalance_and_forged_handles() {
    let mut buf = Vec::new();
    let mut shape = Shape::new(&mut buf);
    shape.begin_clip(ClipRule::Intersect);
    shape.begin_path();
    shape.rect(0.0, 0.0, 10.0, 10.0);
    shape.fill_convex_gradient(GradientHandle(2), false);
    // Missing end_clip

    let report = audit(&buf);
    assert_eq!(report.records, 4);
    assert_eq!(report.violations.len(), 2);
    assert!(matches!(
        report.violations[0],
        Violation::GradientOutOfRange { handle: 2, declared: 0, .. }
    ));
    assert!(matches!(report.violations[1], Violation::ClipUnbalanced { open: 1 }));
}

#[test]
fn tag_bytes_match_the_documented_enumeration() {
    let mut buf = Vec::new();
    let mut shape = Shape::new(&mut buf);
    shape.begin_path();
    assert_eq!(buf[0], CommandTag::BeginPath as u8);

    buf.clear();
    let mut shape = Shape::new(&mut buf);
    shape.begin_clip(ClipRule::Union);
    assert_eq!(buf[0], CommandTag::BeginClip as u8);
    assert_eq!(buf[1], 1);
}
