use super::*;

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn drag_kind_maps_shape_tools() {
    assert_eq!(Tool::Rect.drag_kind(), Some(ShapeKind::Rect));
    assert_eq!(Tool::Circle.drag_kind(), Some(ShapeKind::Circle));
    assert_eq!(Tool::Line.drag_kind(), Some(ShapeKind::Line));
    assert_eq!(Tool::Arrow.drag_kind(), Some(ShapeKind::Arrow));
    assert_eq!(Tool::Pen.drag_kind(), Some(ShapeKind::Pen));
}

#[test]
fn select_and_text_are_not_drag_tools() {
    assert_eq!(Tool::Select.drag_kind(), None);
    assert_eq!(Tool::Text.drag_kind(), None);
}

#[test]
fn only_select_is_non_drawing() {
    assert!(!Tool::Select.is_drawing());
    for tool in [Tool::Rect, Tool::Circle, Tool::Line, Tool::Arrow, Tool::Pen, Tool::Text] {
        assert!(tool.is_drawing(), "{tool:?}");
    }
}

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
    assert!(!m.command());
}

#[test]
fn command_accepts_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Default::default() }.command());
    assert!(Modifiers { meta: true, ..Default::default() }.command());
}

#[test]
fn key_comparison_ignores_ascii_case() {
    assert!(Key::new("Z").is("z"));
    assert!(Key::new("Escape").is("escape"));
    assert!(!Key::new("Delete").is("Backspace"));
}

#[test]
fn input_state_default_is_idle() {
    assert!(matches!(InputState::default(), InputState::Idle));
}

#[test]
fn ui_state_default() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Select);
    assert!(!ui.text_input_focused);
}
