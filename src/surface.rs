//! Surface coordinates: pixel points and percentage pin anchors.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use serde::{Deserialize, Serialize};

/// A point in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A spatial anchor expressed as percentages (0–100) of the rendered surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinPosition {
    pub x: f64,
    pub y: f64,
}

/// Size of the rendered surface in device pixels, supplied by the host each render.
///
/// Shapes live in pixel space; comment pins live in percentage space so they
/// survive resizes. `Surface` converts between the two.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the surface has a drawable area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Convert a pixel point to a clamped percentage anchor.
    ///
    /// Returns `None` for an empty surface.
    #[must_use]
    pub fn to_percent(&self, pt: Point) -> Option<PinPosition> {
        if self.is_empty() {
            return None;
        }
        Some(PinPosition {
            x: (pt.x / self.width * 100.0).clamp(0.0, 100.0),
            y: (pt.y / self.height * 100.0).clamp(0.0, 100.0),
        })
    }

    /// Convert a percentage anchor back to pixels on this surface.
    #[must_use]
    pub fn to_pixels(&self, pos: PinPosition) -> Point {
        Point {
            x: pos.x / 100.0 * self.width,
            y: pos.y / 100.0 * self.height,
        }
    }

    /// Whether `pt` lies on the surface (edges inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= 0.0 && pt.y >= 0.0 && pt.x <= self.width && pt.y <= self.height
    }
}
