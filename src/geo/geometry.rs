use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{RouteMapError, RouteMapResult};

/// Euclidean distance between two planar points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Distance from `p` to the segment `[a, b]`.
///
/// The projection of `p` onto the segment is clamped to the segment, so points
/// beyond either end measure against the nearest endpoint.
pub fn distance_from_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return distance(p, a);
    }

    let t = (p - a).dot(ab) / len2;
    if t < 0.0 {
        distance(p, a)
    } else if t > 1.0 {
        distance(p, b)
    } else {
        distance(p, a + ab * t)
    }
}

/// Index of the first point at the strict minimum distance from `p`.
pub fn nearest_point(p: Point, points: &[Point]) -> RouteMapResult<usize> {
    let first = points
        .first()
        .ok_or_else(|| RouteMapError::geometry("nearest_point over an empty point sequence"))?;

    let mut best = 0;
    let mut best_dist = distance(*first, p);
    for (i, q) in points.iter().enumerate().skip(1) {
        let d = distance(*q, p);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    Ok(best)
}

/// Widen `[start, end]` along `points` by `threshold`.
///
/// Walking forward from `end`, the window stops at the first point farther than
/// `threshold` from `points[end]` (that point is included), or at the last
/// point. The backward walk from `start` mirrors this. Returns `(prev, next)`.
pub fn expand_window(points: &[Point], start: usize, end: usize, threshold: f64) -> (usize, usize) {
    let mut next = end;
    if let Some(&anchor) = points.get(end) {
        for (i, q) in points.iter().enumerate().skip(end + 1) {
            next = i;
            if distance(*q, anchor) > threshold {
                break;
            }
        }
    }

    let mut prev = start;
    if let Some(&anchor) = points.get(start) {
        for i in (0..start).rev() {
            prev = i;
            if distance(points[i], anchor) > threshold {
                break;
            }
        }
    }

    (prev, next)
}

/// Minimum distance from `p` to any of `points`; `None` when `points` is empty.
pub fn min_distance_to_points(p: Point, points: &[Point]) -> Option<f64> {
    points.iter().map(|q| distance(p, *q)).reduce(f64::min)
}

/// Minimum distance from `p` to the polyline through `points`.
///
/// A single point polyline measures against that point; an empty one yields `None`.
pub fn min_distance_to_polyline(p: Point, points: &[Point]) -> Option<f64> {
    let first = distance(p, *points.first()?);
    Some(
        points
            .windows(2)
            .map(|w| distance_from_segment(p, w[0], w[1]))
            .fold(first, f64::min),
    )
}

/// Area of the intersection of two rectangles; zero when they do not overlap.
pub fn overlap_area(a: Rect, b: Rect) -> f64 {
    let i = a.intersect(b);
    if i.width() <= 0.0 || i.height() <= 0.0 {
        return 0.0;
    }
    i.area()
}

#[cfg(test)]
#[path = "../../tests/unit/geo/geometry.rs"]
mod tests;
