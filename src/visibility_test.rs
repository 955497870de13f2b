use super::*;
use crate::shape::{Geometry, Style};

fn anchored(timestamp: Option<f64>, duration: f64) -> Shape {
    Shape::new(
        Geometry::Rect { x: 0.0, y: 0.0, width: 10.0, height: 10.0 },
        &Style::default(),
        timestamp,
        duration,
    )
}

#[test]
fn static_shape_always_visible() {
    let s = anchored(None, 4.0);
    assert!(is_visible(&s, None));
    assert!(is_visible(&s, Some(0.0)));
    assert!(is_visible(&s, Some(9999.0)));
}

#[test]
fn no_clock_shows_anchored_shape() {
    assert!(is_visible(&anchored(Some(10.0), 4.0), None));
}

#[test]
fn inside_half_width_is_visible() {
    let s = anchored(Some(10.0), 4.0);
    assert!(is_visible(&s, Some(9.01)));
    assert!(is_visible(&s, Some(10.0)));
    assert!(is_visible(&s, Some(10.99)));
}

#[test]
fn outside_half_width_is_hidden() {
    let s = anchored(Some(10.0), 4.0);
    assert!(!is_visible(&s, Some(7.99)));
    assert!(!is_visible(&s, Some(12.01)));
}

#[test]
fn exact_half_width_is_hidden() {
    let s = anchored(Some(10.0), 4.0);
    assert!(!is_visible(&s, Some(8.0)));
    assert!(!is_visible(&s, Some(12.0)));
}

#[test]
fn zero_duration_is_never_visible_under_clock() {
    let s = anchored(Some(5.0), 0.0);
    assert!(!is_visible(&s, Some(5.0)));
}

#[test]
fn seeking_changes_visible_set() {
    let early = anchored(Some(2.0), 2.0);
    let late = anchored(Some(20.0), 2.0);
    let always = anchored(None, 2.0);
    let shapes = vec![early.clone(), late.clone(), always.clone()];

    let at_two: Vec<_> = visible_shapes(&shapes, Some(2.0)).map(|s| s.id).collect();
    assert_eq!(at_two, vec![early.id, always.id]);

    let at_twenty: Vec<_> = visible_shapes(&shapes, Some(20.5)).map(|s| s.id).collect();
    assert_eq!(at_twenty, vec![late.id, always.id]);

    assert_eq!(visible_shapes(&shapes, None).count(), 3);
}
