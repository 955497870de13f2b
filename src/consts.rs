//! Shared numeric constants for the markup engine.

// ── Hit-testing ─────────────────────────────────────────────────

/// Default hit slop in device pixels around a shape.
pub const HIT_MARGIN_PX: f64 = 8.0;

/// Extra tolerance added to the margin for thin strokes (lines, arrows, pen).
pub const STROKE_SLOP_PX: f64 = 4.0;

// ── Geometry ────────────────────────────────────────────────────

/// Estimated glyph advance as a fraction of the font size.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;

/// Default arrowhead side length in pixels.
pub const ARROW_HEAD_LEN: f64 = 12.0;

/// Arrowhead half-angle (30°) measured from the reversed shaft direction.
pub const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

// ── Gestures ────────────────────────────────────────────────────

/// Manhattan extent a rect/circle/line/arrow must exceed to be committed.
pub const MIN_SHAPE_EXTENT_PX: f64 = 3.0;

/// A pen stroke must accumulate more than this many points to be committed.
pub const MIN_PEN_POINTS: usize = 2;

// ── History ─────────────────────────────────────────────────────

/// Capacity of each of the undo and redo stacks.
pub const HISTORY_LIMIT: usize = 30;

// ── Playback ────────────────────────────────────────────────────

/// Seconds a shape drawn over playable media stays on screen.
pub const DEFAULT_SHAPE_DURATION_SECS: f64 = 3.0;

// ── Style ───────────────────────────────────────────────────────

pub const DEFAULT_COLOR: &str = "#FF3B30";
pub const DEFAULT_LINE_WIDTH: f64 = 3.0;
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
