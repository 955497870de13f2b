//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the active gesture being tracked between
//! pointer-down and pointer-up, carrying the context needed to compute
//! incremental deltas and commit on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::shape::{ShapeId, ShapeKind};
use crate::surface::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pick and move existing shapes (default).
    #[default]
    Select,
    Rect,
    Circle,
    Line,
    Arrow,
    Pen,
    /// Place inline text.
    Text,
}

impl Tool {
    /// The shape kind this tool creates by dragging, if any.
    ///
    /// `Text` is placed by a click rather than sized by a drag, so it
    /// returns `None` along with `Select`.
    #[must_use]
    pub fn drag_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Rect => Some(ShapeKind::Rect),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Line => Some(ShapeKind::Line),
            Self::Arrow => Some(ShapeKind::Arrow),
            Self::Pen => Some(ShapeKind::Pen),
            Self::Select | Self::Text => None,
        }
    }

    /// Whether this tool draws new markup.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        !matches!(self, Self::Select)
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button, pen contact, or single-finger touch.
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Set by the host while keyboard focus is inside a text field, so
    /// that Backspace edits text instead of deleting a shape.
    pub text_input_focused: bool,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Copy, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A new shape is being sized; the transient shape lives in the store.
    Drawing,
    /// An existing shape is being moved.
    DraggingShape {
        id: ShapeId,
        /// Pointer position at the previous event; deltas are taken from here.
        last: Point,
    },
    /// Inline text entry is open at `at`, waiting for submit or cancel.
    EditingText {
        at: Point,
        /// Playback time captured when the entry was opened.
        timestamp: Option<f64>,
    },
}
