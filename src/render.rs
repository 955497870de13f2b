//! Rendering: turns engine state into a backend-agnostic display list.
//!
//! The host owns the actual drawing surface (canvas, GPU, PDF overlay). This
//! module receives a read-only view of the engine and produces the ordered
//! draw commands for the current frame. It does not mutate any state.
//!
//! Layers, bottom to top: committed shapes visible at the playback time,
//! the transient shape being drawn, then the selection outline.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::ARROW_HEAD_LEN;
use crate::engine::EngineCore;
use crate::geometry::{self, Bounds};
use crate::shape::{Geometry, Shape};
use crate::surface::Point;
use crate::visibility;

/// Padding between a selected shape and its outline, in pixels.
const SELECTION_PADDING_PX: f64 = 4.0;

/// One primitive for the host to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    StrokeRect { bounds: Bounds, color: String, line_width: f64 },
    StrokeEllipse { bounds: Bounds, color: String, line_width: f64 },
    /// Open polyline through `points`.
    StrokePath { points: Vec<Point>, color: String, line_width: f64 },
    FillText { origin: Point, text: String, color: String, font_size: f64 },
    /// Dashed outline around the selected shape.
    SelectionOutline { bounds: Bounds },
}

/// Build the display list for the current frame.
#[must_use]
pub fn scene(core: &EngineCore) -> Vec<DrawCommand> {
    let mut out = Vec::new();

    for shape in visibility::visible_shapes(core.shapes(), core.playback_time) {
        draw_shape(shape, &mut out);
    }

    if let Some(shape) = core.store.drawing() {
        draw_shape(shape, &mut out);
    }

    if let Some(shape) = core.store.selected_shape() {
        if visibility::is_visible(shape, core.playback_time) {
            out.push(DrawCommand::SelectionOutline {
                bounds: geometry::bounding_box(shape).expand(SELECTION_PADDING_PX),
            });
        }
    }

    out
}

fn draw_shape(shape: &Shape, out: &mut Vec<DrawCommand>) {
    let color = shape.color.clone();
    let line_width = shape.line_width;
    match &shape.geometry {
        Geometry::Rect { .. } => {
            out.push(DrawCommand::StrokeRect { bounds: geometry::bounding_box(shape), color, line_width });
        }
        Geometry::Circle { .. } => {
            out.push(DrawCommand::StrokeEllipse { bounds: geometry::bounding_box(shape), color, line_width });
        }
        Geometry::Line { x, y, x2, y2 } => {
            out.push(DrawCommand::StrokePath {
                points: vec![Point::new(*x, *y), Point::new(*x2, *y2)],
                color,
                line_width,
            });
        }
        Geometry::Arrow { x, y, x2, y2 } => {
            let tail = Point::new(*x, *y);
            let tip = Point::new(*x2, *y2);
            out.push(DrawCommand::StrokePath { points: vec![tail, tip], color: color.clone(), line_width });
            for barb in geometry::arrow_head(tail, tip, ARROW_HEAD_LEN) {
                out.push(DrawCommand::StrokePath { points: vec![barb.from, barb.to], color: color.clone(), line_width });
            }
        }
        Geometry::Pen { points } => {
            if points.len() > 1 {
                out.push(DrawCommand::StrokePath { points: points.clone(), color, line_width });
            }
        }
        Geometry::Text { x, y, content, font_size } => {
            out.push(DrawCommand::FillText {
                origin: Point::new(*x, *y),
                text: content.clone(),
                color,
                font_size: *font_size,
            });
        }
    }
}
