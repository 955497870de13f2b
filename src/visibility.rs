//! Temporal visibility for markup anchored to playable media.
//!
//! Visibility is evaluated fresh on every frame from the playback clock; it
//! is never stored on a shape, so seeking needs no bookkeeping.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use crate::shape::Shape;

/// Whether `shape` should be drawn at `current_time`.
///
/// Unanchored shapes and a missing clock are always visible. Otherwise the
/// shape shows while strictly within half its duration of its timestamp.
#[must_use]
pub fn is_visible(shape: &Shape, current_time: Option<f64>) -> bool {
    match (shape.timestamp, current_time) {
        (Some(ts), Some(now)) => (ts - now).abs() < shape.duration / 2.0,
        _ => true,
    }
}

/// Iterate the shapes visible at `current_time`, preserving draw order.
pub fn visible_shapes(shapes: &[Shape], current_time: Option<f64>) -> impl Iterator<Item = &Shape> {
    shapes.iter().filter(move |s| is_visible(s, current_time))
}
