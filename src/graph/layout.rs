use crate::foundation::core::{Point, Rect};

/// Smallest radius used by [`circle_positions`].
pub const CIRCLE_MIN_RADIUS: f64 = 80.0;
/// Arc length reserved per node on the circle.
pub const CIRCLE_NODE_SPACING: f64 = 48.0;

/// Place `count` nodes evenly on a circle centered at the origin.
///
/// The first node sits at the top and the rest follow clockwise in id order, so the result only
/// depends on `count`. A single node is placed at the origin.
pub fn circle_positions(count: usize) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![Point::ORIGIN];
    }

    let n = count as f64;
    let radius = (CIRCLE_NODE_SPACING * n / std::f64::consts::TAU).max(CIRCLE_MIN_RADIUS);
    (0..count)
        .map(|i| {
            let angle = -std::f64::consts::FRAC_PI_2 + std::f64::consts::TAU * (i as f64) / n;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Axis-aligned bounding box of `points`; a zero rect at the origin when empty.
pub fn bounds(points: impl IntoIterator<Item = Point>) -> Rect {
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    iter.fold(Rect::from_points(first, first), |r, p| r.union_pt(p))
}

#[cfg(test)]
#[path = "../../tests/unit/graph/layout.rs"]
mod tests;
