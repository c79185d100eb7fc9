//! Integration tests for math layout
//!
//! Build complete formulas through the public API and check where the
//! engine puts their glyphs.

use math_layout::{
    Color, DrawCommand, EnvInstruction, HorizontalAlignment, LayoutConfig, LayoutEngine, MathNode,
    ModifyEnvironmentNode, RecordingCanvas, VerticalListNode, VerticalOrientation,
};
use text_metrics::{ApproximateMetrics, MetricsProfile};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Monospace face: ascent 8, descent 2 at 10pt, every glyph 5 wide
fn mono_engine() -> LayoutEngine {
    LayoutEngine::with_metrics(
        LayoutConfig::default(),
        ApproximateMetrics::with_profile(MetricsProfile::monospace(0.5)),
    )
}

/// `\sum_{i=1}^{n} x_i^2`
fn sum_formula() -> MathNode {
    MathNode::hlist(vec![
        MathNode::symbol("sum"),
        MathNode::subscript(MathNode::hlist(vec![
            MathNode::text("i"),
            MathNode::symbol("="),
            MathNode::text("1"),
        ])),
        MathNode::superscript(MathNode::text("n")),
        MathNode::text("x"),
        MathNode::subscript(MathNode::text("i")),
        MathNode::superscript(MathNode::text("2")),
    ])
}

fn texts(commands: &[DrawCommand]) -> Vec<(f64, f64, String)> {
    commands
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Text { x, y, text, .. } => Some((*x, *y, text.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_sum_with_limits_and_scripts() {
    let engine = mono_engine();
    let env = engine.math_environment();
    let node = sum_formula();
    let output = engine.render_in(&node, &env).unwrap();
    let glyphs = texts(&output.commands);

    let order: Vec<&str> = glyphs.iter().map(|g| g.2.as_str()).collect();
    assert_eq!(order, vec!["\u{2211}", "i", "=", "1", "n", "x", "i", "2"]);

    let baseline = output.size.baseline_height;
    let (sum, lower, upper) = (&glyphs[0], &glyphs[1], &glyphs[4]);
    assert!(approx(sum.1, baseline));
    // limits stacked below and above the operator
    assert!(lower.1 > sum.1);
    assert!(upper.1 < sum.1);
    assert!(glyphs[3].0 > lower.0);

    // x_i^2 share one position: the subscript moves right by half a line
    // width, then italic correction (0.4 * space) pulls it left and pushes
    // the superscript right
    let (x, sub, sup) = (&glyphs[5], &glyphs[6], &glyphs[7]);
    assert!(x.0 > sum.0);
    assert!(approx(sub.0 - sup.0, 0.25 - 2.0 * 2.0));
    assert!(sub.1 > baseline);
    assert!(sup.1 < baseline);

    // nothing is drawn above the box
    assert!(glyphs.iter().all(|g| g.1 >= 0.0));
}

#[test]
fn test_draw_matches_measure_for_proportional_metrics() {
    let engine = LayoutEngine::default();
    let env = engine.math_environment();
    let node = sum_formula();
    let size = engine.measure_in(&node, &env).unwrap();
    assert!(size.overall_height >= size.baseline_height);

    let mut canvas = RecordingCanvas::new();
    let end = engine.draw_in(&node, &mut canvas, 12.0, 40.0, &env).unwrap();
    assert!(approx(end, 12.0 + size.width));
    assert_eq!(engine.measure_in(&node, &env).unwrap(), size);
}

#[test]
fn test_multiline_block() {
    let engine = mono_engine();
    let block = VerticalListNode::with_children(vec![
        MathNode::text("abcd"),
        ModifyEnvironmentNode::new(EnvInstruction::Color(Color::BLUE)).into(),
        MathNode::text("ab"),
    ])
    .with_alignment(HorizontalAlignment::Centered)
    .with_orientation(VerticalOrientation::Top);
    let output = engine.render(&block.into()).unwrap();

    assert_eq!(output.size.baseline_height, 0.0);
    assert_eq!(output.size.width, 20.0);

    let colored: Vec<(f64, Color)> = output
        .commands
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Text { x, color, .. } => Some((*x, *color)),
            _ => None,
        })
        .collect();
    assert_eq!(colored, vec![(0.0, Color::BLACK), (5.0, Color::BLUE)]);
}

#[test]
fn test_missing_glyph_falls_back_to_standard_form() {
    let metrics = ApproximateMetrics::with_profile(MetricsProfile::monospace(0.5)).without_glyphs("Serif", ['\u{210F}']);
    let engine = LayoutEngine::with_metrics(LayoutConfig::default(), metrics);
    let output = engine.render(&MathNode::symbol("hbar")).unwrap();

    let glyphs = texts(&output.commands);
    assert_eq!(glyphs.len(), 1);
    assert_eq!(glyphs[0].2, "h");
    assert!(output
        .commands
        .iter()
        .any(|cmd| matches!(cmd, DrawCommand::Line { .. })));
}

#[test]
fn test_unknown_symbol_draws_placeholder() {
    let engine = mono_engine();
    let output = engine.render(&MathNode::symbol("nosuchsymbol")).unwrap();
    assert!(output.size.width > 0.0);
    assert!(matches!(output.commands.as_slice(), [DrawCommand::Rect { .. }]));
}
