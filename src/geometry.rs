//! Geometry kernel: bounding boxes, distances, hit-testing, arrowheads.
//!
//! Everything here is a pure function of shape records. Coordinates are
//! surface pixels.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::{ARROW_HEAD_ANGLE, STROKE_SLOP_PX, TEXT_WIDTH_FACTOR};
use crate::shape::{Geometry, Shape, ShapeId};
use crate::surface::Point;

/// Axis-aligned box with non-negative extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    /// Normalize an anchor plus signed extent into a box.
    #[must_use]
    pub fn from_signed(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: x.min(x + width),
            y: y.min(y + height),
            w: width.abs(),
            h: height.abs(),
        }
    }

    /// Box spanning two corner points.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::from_signed(a.x, a.y, b.x - a.x, b.y - a.y)
    }

    /// Grow by `margin` on every side.
    #[must_use]
    pub fn expand(self, margin: f64) -> Self {
        Self { x: self.x - margin, y: self.y - margin, w: self.w + 2.0 * margin, h: self.h + 2.0 * margin }
    }

    /// Whether `pt` lies inside or on the edge.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.x + self.w && pt.y >= self.y && pt.y <= self.y + self.h
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Estimated width of `content` at `font_size`; glyph metrics are not available.
#[must_use]
pub fn estimated_text_width(content: &str, font_size: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let chars = content.chars().count() as f64;
    chars * font_size * TEXT_WIDTH_FACTOR
}

/// Derive the bounding box of a shape from its geometry.
#[must_use]
pub fn bounding_box(shape: &Shape) -> Bounds {
    match &shape.geometry {
        Geometry::Rect { x, y, width, height } | Geometry::Circle { x, y, width, height } => {
            Bounds::from_signed(*x, *y, *width, *height)
        }
        Geometry::Line { x, y, x2, y2 } | Geometry::Arrow { x, y, x2, y2 } => {
            Bounds::from_corners(Point::new(*x, *y), Point::new(*x2, *y2))
        }
        Geometry::Pen { points } => points_bounds(points),
        Geometry::Text { x, y, content, font_size } => Bounds {
            x: *x,
            y: *y,
            w: estimated_text_width(content, *font_size),
            h: *font_size,
        },
    }
}

fn points_bounds(points: &[Point]) -> Bounds {
    let Some(first) = points.first() else {
        return Bounds::default();
    };
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Bounds { x: min_x, y: min_y, w: max_x - min_x, h: max_y - min_y }
}

/// Shortest distance from `pt` to the segment `a`–`b`.
///
/// The projection is clamped to the segment, so points past either end
/// measure to the nearer endpoint. A degenerate segment is a point.
#[must_use]
pub fn point_segment_distance(pt: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < f64::EPSILON {
        return pt.distance(a);
    }
    let t = (((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    pt.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Whether `pt` hits `shape` within `margin` pixels.
#[must_use]
pub fn hit_test(shape: &Shape, pt: Point, margin: f64) -> bool {
    let stroke_tolerance = margin + STROKE_SLOP_PX;
    match &shape.geometry {
        Geometry::Rect { .. } | Geometry::Text { .. } => bounding_box(shape).expand(margin).contains(pt),
        Geometry::Circle { .. } => {
            let b = bounding_box(shape);
            let c = b.center();
            let rx = b.w / 2.0 + margin;
            let ry = b.h / 2.0 + margin;
            let nx = (pt.x - c.x) / rx;
            let ny = (pt.y - c.y) / ry;
            nx * nx + ny * ny <= 1.0
        }
        Geometry::Line { x, y, x2, y2 } | Geometry::Arrow { x, y, x2, y2 } => {
            point_segment_distance(pt, Point::new(*x, *y), Point::new(*x2, *y2)) <= stroke_tolerance
        }
        Geometry::Pen { points } => match points.as_slice() {
            [] => false,
            [only] => pt.distance(*only) <= stroke_tolerance,
            _ => points
                .windows(2)
                .any(|w| point_segment_distance(pt, w[0], w[1]) <= stroke_tolerance),
        },
    }
}

/// Top-most shape under `pt`. Later shapes are drawn above earlier ones,
/// so the scan runs from the back of the slice.
#[must_use]
pub fn hit_test_all(shapes: &[Shape], pt: Point, margin: f64) -> Option<ShapeId> {
    shapes.iter().rev().find(|s| hit_test(s, pt, margin)).map(|s| s.id)
}

/// The two barbs of an arrowhead at `tip`, for a shaft running `tail` → `tip`.
///
/// Each barb leaves the tip at ±30° from the reversed shaft direction.
#[must_use]
pub fn arrow_head(tail: Point, tip: Point, head_len: f64) -> [Segment; 2] {
    let angle = (tip.y - tail.y).atan2(tip.x - tail.x);
    let barb = |offset: f64| Segment {
        from: tip,
        to: Point::new(
            tip.x - head_len * (angle + offset).cos(),
            tip.y - head_len * (angle + offset).sin(),
        ),
    };
    [barb(-ARROW_HEAD_ANGLE), barb(ARROW_HEAD_ANGLE)]
}
