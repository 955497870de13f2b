#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::{ARROW_HEAD_LEN, HIT_MARGIN_PX};
use crate::shape::Style;

fn shape(geometry: Geometry) -> Shape {
    Shape::new(geometry, &Style::default(), None, 3.0)
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Shape {
    shape(Geometry::Rect { x, y, width, height })
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// =============================================================
// Bounding boxes
// =============================================================

#[test]
fn rect_bounds_positive_extent() {
    assert_eq!(bounding_box(&rect(10.0, 20.0, 30.0, 40.0)), Bounds { x: 10.0, y: 20.0, w: 30.0, h: 40.0 });
}

#[test]
fn rect_bounds_normalizes_reversed_drag() {
    assert_eq!(bounding_box(&rect(50.0, 50.0, -20.0, -10.0)), Bounds { x: 30.0, y: 40.0, w: 20.0, h: 10.0 });
}

#[test]
fn line_bounds_span_endpoints() {
    let s = shape(Geometry::Line { x: 10.0, y: 5.0, x2: 2.0, y2: 25.0 });
    assert_eq!(bounding_box(&s), Bounds { x: 2.0, y: 5.0, w: 8.0, h: 20.0 });
}

#[test]
fn pen_bounds_cover_all_points() {
    let s = shape(Geometry::Pen { points: vec![pt(5.0, 5.0), pt(-3.0, 10.0), pt(12.0, 1.0)] });
    assert_eq!(bounding_box(&s), Bounds { x: -3.0, y: 1.0, w: 15.0, h: 9.0 });
}

#[test]
fn empty_pen_bounds_are_zero() {
    let s = shape(Geometry::Pen { points: vec![] });
    assert_eq!(bounding_box(&s), Bounds::default());
}

#[test]
fn text_bounds_use_estimated_width() {
    let s = shape(Geometry::Text { x: 10.0, y: 10.0, content: "hello".into(), font_size: 20.0 });
    let b = bounding_box(&s);
    assert!(approx(b.w, 5.0 * 20.0 * 0.6));
    assert_eq!(b.h, 20.0);
    assert_eq!((b.x, b.y), (10.0, 10.0));
}

#[test]
fn text_width_counts_chars_not_bytes() {
    assert!(approx(estimated_text_width("héé", 10.0), 18.0));
}

// =============================================================
// Point/segment distance
// =============================================================

#[test]
fn distance_to_segment_interior_is_perpendicular() {
    assert!(approx(point_segment_distance(pt(5.0, 3.0), pt(0.0, 0.0), pt(10.0, 0.0)), 3.0));
}

#[test]
fn distance_past_end_clamps_to_endpoint() {
    assert!(approx(point_segment_distance(pt(13.0, 4.0), pt(0.0, 0.0), pt(10.0, 0.0)), 5.0));
}

#[test]
fn distance_to_degenerate_segment_is_point_distance() {
    assert!(approx(point_segment_distance(pt(3.0, 4.0), pt(0.0, 0.0), pt(0.0, 0.0)), 5.0));
}

// =============================================================
// Hit-testing
// =============================================================

#[test]
fn rect_edge_is_a_hit() {
    let r = rect(10.0, 10.0, 40.0, 40.0);
    assert!(hit_test(&r, pt(10.0, 25.0), HIT_MARGIN_PX));
    assert!(hit_test(&r, pt(50.0, 50.0), HIT_MARGIN_PX));
}

#[test]
fn rect_margin_boundary() {
    let r = rect(10.0, 10.0, 40.0, 40.0);
    assert!(hit_test(&r, pt(10.0 - HIT_MARGIN_PX, 25.0), HIT_MARGIN_PX));
    assert!(!hit_test(&r, pt(10.0 - HIT_MARGIN_PX - 1.0, 25.0), HIT_MARGIN_PX));
    assert!(!hit_test(&r, pt(50.0 + HIT_MARGIN_PX + 1.0, 25.0), HIT_MARGIN_PX));
}

#[test]
fn reversed_rect_still_hits() {
    let r = rect(50.0, 50.0, -40.0, -40.0);
    assert!(hit_test(&r, pt(30.0, 30.0), HIT_MARGIN_PX));
}

#[test]
fn circle_hit_uses_ellipse_test() {
    let c = shape(Geometry::Circle { x: 0.0, y: 0.0, width: 100.0, height: 50.0 });
    assert!(hit_test(&c, pt(50.0, 25.0), HIT_MARGIN_PX));
    // Right-most extent plus margin.
    assert!(hit_test(&c, pt(100.0 + HIT_MARGIN_PX, 25.0), HIT_MARGIN_PX));
    // The box corner is outside the ellipse.
    assert!(!hit_test(&c, pt(0.0, 0.0), HIT_MARGIN_PX));
}

#[test]
fn line_hit_within_margin_plus_slop() {
    let l = shape(Geometry::Line { x: 0.0, y: 0.0, x2: 100.0, y2: 0.0 });
    assert!(hit_test(&l, pt(50.0, 12.0), HIT_MARGIN_PX));
    assert!(!hit_test(&l, pt(50.0, 12.5), HIT_MARGIN_PX));
}

#[test]
fn arrow_hits_like_line() {
    let a = shape(Geometry::Arrow { x: 0.0, y: 0.0, x2: 0.0, y2: 100.0 });
    assert!(hit_test(&a, pt(11.0, 40.0), HIT_MARGIN_PX));
    assert!(!hit_test(&a, pt(40.0, 40.0), HIT_MARGIN_PX));
}

#[test]
fn pen_hit_checks_every_segment() {
    let p = shape(Geometry::Pen { points: vec![pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0)] });
    assert!(hit_test(&p, pt(105.0, 60.0), HIT_MARGIN_PX));
    assert!(!hit_test(&p, pt(50.0, 50.0), HIT_MARGIN_PX));
}

#[test]
fn single_point_pen_hits_near_point() {
    let p = shape(Geometry::Pen { points: vec![pt(10.0, 10.0)] });
    assert!(hit_test(&p, pt(12.0, 12.0), HIT_MARGIN_PX));
    assert!(!hit_test(&shape(Geometry::Pen { points: vec![] }), pt(0.0, 0.0), HIT_MARGIN_PX));
}

#[test]
fn text_hit_uses_expanded_estimate() {
    let t = shape(Geometry::Text { x: 0.0, y: 0.0, content: "abcd".into(), font_size: 10.0 });
    // Estimated width 24, height 10.
    assert!(hit_test(&t, pt(24.0 + HIT_MARGIN_PX, 5.0), HIT_MARGIN_PX));
    assert!(!hit_test(&t, pt(24.0 + HIT_MARGIN_PX + 1.0, 5.0), HIT_MARGIN_PX));
}

#[test]
fn hit_test_all_prefers_top_most() {
    let bottom = rect(0.0, 0.0, 100.0, 100.0);
    let top = rect(20.0, 20.0, 20.0, 20.0);
    let shapes = vec![bottom.clone(), top.clone()];
    assert_eq!(hit_test_all(&shapes, pt(30.0, 30.0), HIT_MARGIN_PX), Some(top.id));
    assert_eq!(hit_test_all(&shapes, pt(80.0, 80.0), HIT_MARGIN_PX), Some(bottom.id));
    assert_eq!(hit_test_all(&shapes, pt(300.0, 300.0), HIT_MARGIN_PX), None);
}

// =============================================================
// Arrowheads
// =============================================================

#[test]
fn arrow_head_barbs_start_at_tip() {
    let [a, b] = arrow_head(pt(0.0, 0.0), pt(100.0, 0.0), ARROW_HEAD_LEN);
    assert_eq!(a.from, pt(100.0, 0.0));
    assert_eq!(b.from, pt(100.0, 0.0));
}

#[test]
fn arrow_head_barbs_are_symmetric_at_thirty_degrees() {
    let [a, b] = arrow_head(pt(0.0, 0.0), pt(100.0, 0.0), ARROW_HEAD_LEN);
    let back = ARROW_HEAD_LEN * (std::f64::consts::PI / 6.0).cos();
    let side = ARROW_HEAD_LEN * (std::f64::consts::PI / 6.0).sin();
    assert!(approx(a.to.x, 100.0 - back));
    assert!(approx(b.to.x, 100.0 - back));
    assert!(approx(a.to.y, side));
    assert!(approx(b.to.y, -side));
}

#[test]
fn arrow_head_barbs_have_head_length() {
    let [a, b] = arrow_head(pt(3.0, 7.0), pt(-40.0, 55.0), 20.0);
    assert!(approx(a.from.distance(a.to), 20.0));
    assert!(approx(b.from.distance(b.to), 20.0));
}
