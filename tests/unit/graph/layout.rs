use super::*;

#[test]
fn circle_of_one_is_origin() {
    assert_eq!(circle_positions(1), vec![Point::ORIGIN]);
    assert!(circle_positions(0).is_empty());
}

#[test]
fn circle_starts_at_top_and_keeps_radius() {
    let pts = circle_positions(4);
    assert_eq!(pts.len(), 4);
    assert!(pts[0].x.abs() < 1e-9);
    assert!((pts[0].y + CIRCLE_MIN_RADIUS).abs() < 1e-9);
    for p in &pts {
        let r = (p.x * p.x + p.y * p.y).sqrt();
        assert!((r - CIRCLE_MIN_RADIUS).abs() < 1e-9);
    }
}

#[test]
fn large_circles_grow_with_node_count() {
    let pts = circle_positions(40);
    let r = (pts[0].x * pts[0].x + pts[0].y * pts[0].y).sqrt();
    assert!(r > CIRCLE_MIN_RADIUS);
}

#[test]
fn bounds_cover_all_points() {
    let r = bounds([
        Point::new(1.0, 5.0),
        Point::new(-3.0, 2.0),
        Point::new(4.0, -1.0),
    ]);
    assert_eq!(r, Rect::new(-3.0, -1.0, 4.0, 5.0));
    assert_eq!(bounds(std::iter::empty()), Rect::ZERO);
}
