//! Shape model: markup records, their geometry, and the in-memory store.
//!
//! This module defines what a piece of markup is (`Shape`, `Geometry`,
//! `ShapeKind`), the drawing style stamped onto new shapes (`Style`), and the
//! runtime store that owns the committed shapes together with the transient
//! shape being drawn and the current selection (`ShapeStore`).
//!
//! Bounding boxes are never stored. They are derived from geometry by
//! [`crate::geometry::bounding_box`], so moving a shape only ever rewrites
//! the point-like fields of its `Geometry`.
//!
//! Store order is draw order: the last shape is the top-most one.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, DEFAULT_LINE_WIDTH, MIN_PEN_POINTS, MIN_SHAPE_EXTENT_PX};
use crate::history::Snapshot;
use crate::surface::Point;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// The kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Ellipse inscribed in the anchor/extent box.
    Circle,
    /// Straight segment.
    Line,
    /// Segment with an arrowhead at the second endpoint.
    Arrow,
    /// Freehand polyline.
    Pen,
    /// Single line of literal text.
    Text,
}

/// Type-specific geometry of a shape.
///
/// `width`/`height` on rects and circles are signed: a negative value means
/// the drag went left or up from the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { x: f64, y: f64, width: f64, height: f64 },
    Line { x: f64, y: f64, x2: f64, y2: f64 },
    Arrow { x: f64, y: f64, x2: f64, y2: f64 },
    Pen { points: Vec<Point> },
    Text { x: f64, y: f64, content: String, font_size: f64 },
}

impl Geometry {
    /// Zero-extent geometry of `kind` seeded at `at`.
    #[must_use]
    pub fn seed(kind: ShapeKind, at: Point, font_size: f64) -> Self {
        let Point { x, y } = at;
        match kind {
            ShapeKind::Rect => Self::Rect { x, y, width: 0.0, height: 0.0 },
            ShapeKind::Circle => Self::Circle { x, y, width: 0.0, height: 0.0 },
            ShapeKind::Line => Self::Line { x, y, x2: x, y2: y },
            ShapeKind::Arrow => Self::Arrow { x, y, x2: x, y2: y },
            ShapeKind::Pen => Self::Pen { points: vec![at] },
            ShapeKind::Text => Self::Text { x, y, content: String::new(), font_size },
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rect { .. } => ShapeKind::Rect,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Line { .. } => ShapeKind::Line,
            Self::Arrow { .. } => ShapeKind::Arrow,
            Self::Pen { .. } => ShapeKind::Pen,
            Self::Text { .. } => ShapeKind::Text,
        }
    }

    /// Update the trailing field(s) for a drag that has reached `pt`.
    ///
    /// Rects and circles get a new extent, lines and arrows a new second
    /// endpoint, pens an appended point. Text is not drag-sized.
    pub fn drag_to(&mut self, pt: Point) {
        match self {
            Self::Rect { x, y, width, height } | Self::Circle { x, y, width, height } => {
                *width = pt.x - *x;
                *height = pt.y - *y;
            }
            Self::Line { x2, y2, .. } | Self::Arrow { x2, y2, .. } => {
                *x2 = pt.x;
                *y2 = pt.y;
            }
            Self::Pen { points } => points.push(pt),
            Self::Text { .. } => {}
        }
    }

    /// Translate every point-like field by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Rect { x, y, .. } | Self::Circle { x, y, .. } | Self::Text { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Self::Line { x, y, x2, y2 } | Self::Arrow { x, y, x2, y2 } => {
                *x += dx;
                *y += dy;
                *x2 += dx;
                *y2 += dy;
            }
            Self::Pen { points } => {
                for p in points {
                    p.x += dx;
                    p.y += dy;
                }
            }
        }
    }

    /// Whether the geometry is large enough to be committed.
    ///
    /// Pens need more than two points; rects, circles, lines and arrows need
    /// a Manhattan extent above the minimum; text needs non-blank content.
    #[must_use]
    pub fn meets_minimum_size(&self) -> bool {
        match self {
            Self::Rect { width, height, .. } | Self::Circle { width, height, .. } => {
                width.abs() + height.abs() > MIN_SHAPE_EXTENT_PX
            }
            Self::Line { x, y, x2, y2 } | Self::Arrow { x, y, x2, y2 } => {
                (x2 - x).abs() + (y2 - y).abs() > MIN_SHAPE_EXTENT_PX
            }
            Self::Pen { points } => points.len() > MIN_PEN_POINTS,
            Self::Text { content, .. } => !content.trim().is_empty(),
        }
    }
}

/// Drawing style applied to newly created shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub color: String,
    pub line_width: f64,
    pub font_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            line_width: DEFAULT_LINE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// One piece of markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier for this shape.
    pub id: ShapeId,
    /// Type-specific geometry, serialized inline with a `type` tag.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Stroke/fill color as a CSS color string.
    pub color: String,
    /// Stroke width in pixels.
    pub line_width: f64,
    /// Playback second this shape is anchored to; `None` on static assets.
    pub timestamp: Option<f64>,
    /// Seconds of visibility centered on `timestamp`.
    pub duration: f64,
}

impl Shape {
    /// Create a shape with a fresh id.
    #[must_use]
    pub fn new(geometry: Geometry, style: &Style, timestamp: Option<f64>, duration: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            color: style.color.clone(),
            line_width: style.line_width,
            timestamp,
            duration,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }
}

/// In-memory store of shapes for one drawing surface.
///
/// Besides the committed shapes it holds the transient "being drawn" shape
/// and the selected id, so that several surfaces (e.g. side-by-side compare)
/// can each own an independent store.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
    drawing: Option<Shape>,
    selected: Option<ShapeId>,
}

impl ShapeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed shapes in draw order (bottom first).
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == *id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == *id)
    }

    /// Insert or replace a shape. A new id is placed on top.
    pub fn insert(&mut self, shape: Shape) {
        if let Some(existing) = self.get_mut(&shape.id) {
            *existing = shape;
        } else {
            self.shapes.push(shape);
        }
    }

    /// Remove a shape by id, returning it if it was present. Clears the
    /// selection when it pointed at the removed shape.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let idx = self.shapes.iter().position(|s| s.id == *id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        Some(self.shapes.remove(idx))
    }

    /// Remove every committed shape and the selection.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.selected = None;
    }

    /// Replace all shapes with a host-supplied list.
    pub fn load(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.drop_stale_selection();
    }

    /// Immutable copy of the committed shapes.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.shapes.clone())
    }

    /// Make `snapshot` the current shape list.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.shapes = snapshot.into_shapes();
        self.drop_stale_selection();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    // --- Transient shape ---

    /// The shape currently being drawn, if any.
    #[must_use]
    pub fn drawing(&self) -> Option<&Shape> {
        self.drawing.as_ref()
    }

    pub fn drawing_mut(&mut self) -> Option<&mut Shape> {
        self.drawing.as_mut()
    }

    /// Start drawing `shape`, replacing any previous transient shape.
    pub fn begin_drawing(&mut self, shape: Shape) {
        self.drawing = Some(shape);
    }

    /// Detach the transient shape.
    pub fn take_drawing(&mut self) -> Option<Shape> {
        self.drawing.take()
    }

    // --- Selection ---

    #[must_use]
    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
    }

    /// The selected shape, if the selection points at a live shape.
    #[must_use]
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn select(&mut self, id: Option<ShapeId>) {
        self.selected = id;
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.selected {
            if self.get(&id).is_none() {
                self.selected = None;
            }
        }
    }
}
