#![allow(clippy::float_cmp)]

use super::*;
use crate::input::{Button, Modifiers, Tool};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn draw(core: &mut EngineCore, tool: Tool, from: (f64, f64), to: (f64, f64)) {
    core.set_tool(tool);
    core.on_pointer_down(pt(from.0, from.1), Button::Primary, Modifiers::default());
    core.on_pointer_move(pt(to.0, to.1), Modifiers::default());
    core.on_pointer_up(pt(to.0, to.1), Button::Primary, Modifiers::default());
}

#[test]
fn empty_engine_renders_nothing() {
    assert!(scene(&EngineCore::new()).is_empty());
}

#[test]
fn rect_renders_normalized_bounds() {
    let mut core = EngineCore::new();
    draw(&mut core, Tool::Rect, (50.0, 50.0), (10.0, 10.0));
    let cmds = scene(&core);
    assert_eq!(cmds.len(), 1);
    let DrawCommand::StrokeRect { bounds, .. } = &cmds[0] else {
        panic!("expected rect, got {cmds:?}");
    };
    assert_eq!(*bounds, Bounds { x: 10.0, y: 10.0, w: 40.0, h: 40.0 });
}

#[test]
fn arrow_expands_to_shaft_and_two_barbs() {
    let mut core = EngineCore::new();
    draw(&mut core, Tool::Arrow, (0.0, 0.0), (100.0, 0.0));
    let cmds = scene(&core);
    assert_eq!(cmds.len(), 3);
    assert!(cmds.iter().all(|c| matches!(c, DrawCommand::StrokePath { .. })));
}

#[test]
fn hidden_shapes_are_skipped() {
    let mut core = EngineCore::new();
    core.set_playback_time(Some(1.0));
    draw(&mut core, Tool::Circle, (0.0, 0.0), (30.0, 30.0));
    assert_eq!(scene(&core).len(), 1);
    core.set_playback_time(Some(30.0));
    assert!(scene(&core).is_empty());
}

#[test]
fn transient_shape_is_drawn_on_top() {
    let mut core = EngineCore::new();
    draw(&mut core, Tool::Rect, (0.0, 0.0), (30.0, 30.0));
    core.set_tool(Tool::Line);
    core.on_pointer_down(pt(0.0, 50.0), Button::Primary, Modifiers::default());
    core.on_pointer_move(pt(60.0, 50.0), Modifiers::default());
    let cmds = scene(&core);
    assert_eq!(cmds.len(), 2);
    assert!(matches!(&cmds[1], DrawCommand::StrokePath { points, .. } if points.len() == 2));
}

#[test]
fn selection_outline_is_last() {
    let mut core = EngineCore::new();
    draw(&mut core, Tool::Rect, (0.0, 0.0), (30.0, 30.0));
    core.set_tool(Tool::Select);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, Modifiers::default());
    let cmds = scene(&core);
    assert!(matches!(cmds.last(), Some(DrawCommand::SelectionOutline { bounds }) if bounds.x == -4.0));
}

#[test]
fn text_renders_fill_text() {
    let mut core = EngineCore::new();
    core.set_tool(Tool::Text);
    core.on_pointer_down(pt(5.0, 6.0), Button::Primary, Modifiers::default());
    core.submit_text("hi");
    assert!(matches!(
        &scene(&core)[0],
        DrawCommand::FillText { origin, text, .. } if *origin == pt(5.0, 6.0) && text == "hi"
    ));
}
