//! Gesture controller: turns pointer and keyboard events into shape mutations.
//!
//! `EngineCore` owns one drawing surface's shape store, undo history, active
//! tool and gesture state. Every handler returns the list of [`Action`]s the
//! host should react to (re-render, mirror a change, open a text field).
//!
//! A gesture is down → zero or more moves → up. Drawing tools build a
//! transient shape that is committed on release only if it clears the
//! minimum size; the pre-commit state is checkpointed at that moment. The
//! select tool checkpoints once when a drag starts and then translates the
//! shape by the delta between consecutive moves.

use tracing::debug;

use crate::config::Config;
use crate::consts::{DEFAULT_SHAPE_DURATION_SECS, HIT_MARGIN_PX};
use crate::geometry;
use crate::history::History;
use crate::input::{Button, InputState, Key, Modifiers, Tool, UiState};
use crate::shape::{Geometry, Shape, ShapeId, ShapeKind, ShapeStore, Style};
use crate::surface::{Point, Surface};
use crate::visibility;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new shape entered the store.
    ShapeCommitted(Shape),
    /// An existing shape changed (e.g. moved).
    ShapeUpdated(Shape),
    ShapeDeleted { id: ShapeId },
    /// The host should open an inline text field at `at`.
    EditTextRequested { at: Point },
    SelectionChanged(Option<ShapeId>),
    HistoryChanged { can_undo: bool, can_redo: bool },
    RenderNeeded,
}

/// Engine state for one drawing surface.
pub struct EngineCore {
    pub store: ShapeStore,
    pub history: History,
    pub ui: UiState,
    pub input: InputState,
    pub style: Style,
    pub surface: Surface,
    /// Playback clock in seconds; `None` for static assets.
    pub playback_time: Option<f64>,
    hit_margin: f64,
    shape_duration: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            store: ShapeStore::new(),
            history: History::new(),
            ui: UiState::default(),
            input: InputState::default(),
            style: Style::default(),
            surface: Surface::default(),
            playback_time: None,
            hit_margin: HIT_MARGIN_PX,
            shape_duration: DEFAULT_SHAPE_DURATION_SECS,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with history size, hit margin and shape duration from `config`.
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        Self {
            history: History::with_limit(config.history_limit),
            hit_margin: config.hit_margin_px,
            shape_duration: config.shape_duration_secs,
            ..Self::default()
        }
    }

    // --- Host inputs ---

    /// Update the rendered surface size in device pixels.
    pub fn set_surface(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.surface = Surface::new(width, height);
        vec![Action::RenderNeeded]
    }

    /// Advance or seek the playback clock.
    pub fn set_playback_time(&mut self, time: Option<f64>) -> Vec<Action> {
        self.playback_time = time;
        vec![Action::RenderNeeded]
    }

    /// Replace all shapes with a host-supplied list. History is reset.
    pub fn load_shapes(&mut self, shapes: Vec<Shape>) -> Vec<Action> {
        self.cancel_gesture();
        self.store.load(shapes);
        self.history.clear();
        vec![self.history_changed(), Action::RenderNeeded]
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.ui.text_input_focused = focused;
    }

    /// Switch tools. Any gesture in progress is cancelled, and leaving the
    /// select tool drops the selection.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        if self.ui.tool == tool {
            return Vec::new();
        }
        let mut actions = self.cancel_gesture();
        self.ui.tool = tool;
        if tool.is_drawing() && self.store.selected().is_some() {
            self.store.select(None);
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Pointer events ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut actions = self.cancel_gesture();

        match self.ui.tool {
            Tool::Select => self.begin_select(pt, &mut actions),
            Tool::Text => {
                self.input = InputState::EditingText { at: pt, timestamp: self.playback_time };
                actions.push(Action::EditTextRequested { at: pt });
            }
            tool => {
                if let Some(kind) = tool.drag_kind() {
                    self.begin_drawing(kind, pt);
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        match self.input {
            InputState::Drawing => {
                let Some(shape) = self.store.drawing_mut() else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                shape.geometry.drag_to(pt);
                vec![Action::RenderNeeded]
            }
            InputState::DraggingShape { id, last } => {
                let Some(shape) = self.store.get_mut(&id) else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                shape.geometry.translate(pt.x - last.x, pt.y - last.y);
                let updated = shape.clone();
                self.input = InputState::DraggingShape { id, last: pt };
                vec![Action::ShapeUpdated(updated), Action::RenderNeeded]
            }
            InputState::Idle | InputState::EditingText { .. } => Vec::new(),
        }
    }

    pub fn on_pointer_up(&mut self, pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.finish_gesture(Some(pt))
    }

    /// The pointer left the drawable region: treated as a release in place.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.finish_gesture(None)
    }

    /// Pointer capture was lost: the gesture is abandoned without a commit.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.cancel_gesture()
    }

    // --- Keyboard ---

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is("Escape") {
            return self.cancel_gesture();
        }
        if self.ui.text_input_focused {
            return Vec::new();
        }
        if modifiers.command() && key.is("z") {
            return if modifiers.shift { self.redo() } else { self.undo() };
        }
        if modifiers.command() && key.is("y") {
            return self.redo();
        }
        if (key.is("Delete") || key.is("Backspace")) && self.ui.tool == Tool::Select {
            return self.delete_selected();
        }
        Vec::new()
    }

    // --- Text entry ---

    /// Commit the inline text entry. Blank text discards it.
    pub fn submit_text(&mut self, content: &str) -> Vec<Action> {
        let InputState::EditingText { at, timestamp } = self.input else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        let geometry = Geometry::Text { x: at.x, y: at.y, content: content.to_string(), font_size: self.style.font_size };
        let shape = Shape::new(geometry, &self.style, timestamp, self.shape_duration);
        self.commit(shape)
    }

    /// Close the inline text entry without creating a shape.
    pub fn cancel_text(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::EditingText { .. }) {
            self.input = InputState::Idle;
        }
        Vec::new()
    }

    // --- Edits ---

    pub fn undo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        let Some(prev) = self.history.undo(self.store.snapshot()) else {
            return actions;
        };
        let had_selection = self.store.selected();
        self.store.restore(prev);
        debug!(shapes = self.store.len(), "undo");
        if had_selection != self.store.selected() {
            actions.push(Action::SelectionChanged(self.store.selected()));
        }
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        let Some(next) = self.history.redo(self.store.snapshot()) else {
            return actions;
        };
        let had_selection = self.store.selected();
        self.store.restore(next);
        debug!(shapes = self.store.len(), "redo");
        if had_selection != self.store.selected() {
            actions.push(Action::SelectionChanged(self.store.selected()));
        }
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Delete the selected shape as one undoable step.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.store.selected() else {
            return Vec::new();
        };
        if self.store.get(&id).is_none() {
            self.store.select(None);
            return vec![Action::SelectionChanged(None)];
        }
        self.history.checkpoint(self.store.snapshot());
        self.store.remove(&id);
        debug!(%id, "shape deleted");
        vec![
            Action::ShapeDeleted { id },
            Action::SelectionChanged(None),
            self.history_changed(),
            Action::RenderNeeded,
        ]
    }

    /// Remove every shape as one undoable step.
    pub fn clear_all(&mut self) -> Vec<Action> {
        let mut actions = self.cancel_gesture();
        if self.store.is_empty() {
            return actions;
        }
        self.history.checkpoint(self.store.snapshot());
        let ids: Vec<ShapeId> = self.store.shapes().iter().map(|s| s.id).collect();
        let had_selection = self.store.selected().is_some();
        self.store.clear();
        actions.extend(ids.into_iter().map(|id| Action::ShapeDeleted { id }));
        if had_selection {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.store.selected()
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.store.shapes()
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.store.get(id)
    }

    /// Committed shapes visible at the current playback time, in draw order.
    pub fn visible_shapes(&self) -> impl Iterator<Item = &Shape> {
        visibility::visible_shapes(self.store.shapes(), self.playback_time)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn hit_margin(&self) -> f64 {
        self.hit_margin
    }

    // --- Internals ---

    fn begin_select(&mut self, pt: Point, actions: &mut Vec<Action>) {
        let hit = geometry::hit_test_all(self.store.shapes(), pt, self.hit_margin);
        if hit != self.store.selected() {
            self.store.select(hit);
            actions.push(Action::SelectionChanged(hit));
        }
        if let Some(id) = hit {
            self.history.checkpoint(self.store.snapshot());
            self.input = InputState::DraggingShape { id, last: pt };
            actions.push(self.history_changed());
        }
        actions.push(Action::RenderNeeded);
    }

    fn begin_drawing(&mut self, kind: ShapeKind, pt: Point) {
        let geometry = Geometry::seed(kind, pt, self.style.font_size);
        let shape = Shape::new(geometry, &self.style, self.playback_time, self.shape_duration);
        self.store.begin_drawing(shape);
        self.input = InputState::Drawing;
    }

    /// Release the active gesture. Drawing gestures commit if valid; a drag
    /// applies the last delta up to the release point; open text entry stays open.
    fn finish_gesture(&mut self, release_at: Option<Point>) -> Vec<Action> {
        match self.input {
            InputState::Drawing => {
                self.input = InputState::Idle;
                let Some(mut shape) = self.store.take_drawing() else {
                    return Vec::new();
                };
                if let Some(pt) = release_at {
                    if shape.kind() != ShapeKind::Pen {
                        shape.geometry.drag_to(pt);
                    }
                }
                self.commit(shape)
            }
            InputState::DraggingShape { id, last } => {
                self.input = InputState::Idle;
                let mut actions = Vec::new();
                if let Some(pt) = release_at
                    && let Some(shape) = self.store.get_mut(&id)
                {
                    shape.geometry.translate(pt.x - last.x, pt.y - last.y);
                    actions.push(Action::ShapeUpdated(shape.clone()));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
            InputState::Idle | InputState::EditingText { .. } => Vec::new(),
        }
    }

    /// Abandon the active gesture without committing anything.
    fn cancel_gesture(&mut self) -> Vec<Action> {
        let was = std::mem::take(&mut self.input);
        match was {
            InputState::Drawing => {
                self.store.take_drawing();
                debug!("drawing cancelled");
                vec![Action::RenderNeeded]
            }
            InputState::DraggingShape { .. } => vec![Action::RenderNeeded],
            InputState::Idle | InputState::EditingText { .. } => Vec::new(),
        }
    }

    fn commit(&mut self, shape: Shape) -> Vec<Action> {
        if !shape.geometry.meets_minimum_size() {
            debug!(kind = ?shape.kind(), "shape below minimum size, discarded");
            return vec![Action::RenderNeeded];
        }
        self.history.checkpoint(self.store.snapshot());
        debug!(id = %shape.id, kind = ?shape.kind(), "shape committed");
        self.store.insert(shape.clone());
        vec![Action::ShapeCommitted(shape), self.history_changed(), Action::RenderNeeded]
    }

    fn history_changed(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }
}
