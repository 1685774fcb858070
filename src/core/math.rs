//! Segment-level geometry primitives.
//!
//! Pure functions with no error states: degenerate input (zero-length
//! segments, coincident points) produces a well-defined value instead of
//! failing. Near-boundary ambiguity is absorbed by [`BOUNDARY_EPSILON`]
//! rather than propagated to callers.

use super::Point2D;

/// Boundary-snap tolerance in world units.
///
/// Shared by containment, line-of-sight and same-point tests: points within
/// this distance of a polygon edge are treated as lying on it, so that
/// projection results snapped onto an edge by floating-point rounding do not
/// flip between inside and outside.
pub const BOUNDARY_EPSILON: f32 = 0.005;

/// Squared distance from point `p` to the segment `qr`.
///
/// A degenerate segment (`q == r`) yields the plain point distance;
/// otherwise `p` is projected onto the segment with the projection
/// parameter clamped to `[0, 1]`.
///
/// # Example
/// ```
/// use walkmap::core::{math::distance_to_segment_squared, Point2D};
///
/// let q = Point2D::new(0.0, 0.0);
/// let r = Point2D::new(10.0, 0.0);
/// let d2 = distance_to_segment_squared(&Point2D::new(5.0, 3.0), &q, &r);
/// assert!((d2 - 9.0).abs() < 1e-6);
/// ```
#[inline]
pub fn distance_to_segment_squared(p: &Point2D, q: &Point2D, r: &Point2D) -> f32 {
    let l2 = q.distance_squared(r);
    if l2 == 0.0 {
        return p.distance_squared(r);
    }

    let t = ((p.x - q.x) * (r.x - q.x) + (p.y - q.y) * (r.y - q.y)) / l2;
    if t < 0.0 {
        return p.distance_squared(q);
    }
    if t > 1.0 {
        return p.distance_squared(r);
    }
    p.distance_squared(&Point2D::new(q.x + t * (r.x - q.x), q.y + t * (r.y - q.y)))
}

/// Distance from point `p` to the segment `qr`.
#[inline]
pub fn distance_to_segment(p: &Point2D, q: &Point2D, r: &Point2D) -> f32 {
    distance_to_segment_squared(p, q, r).sqrt()
}

/// Closest point to `p` on the segment `qr` (clamped projection).
///
/// A degenerate segment returns `q`.
#[inline]
pub fn project_onto_segment(p: &Point2D, q: &Point2D, r: &Point2D) -> Point2D {
    let l2 = q.distance_squared(r);
    if l2 == 0.0 {
        return *q;
    }

    let t = ((p.x - q.x) * (r.x - q.x) + (p.y - q.y) * (r.y - q.y)) / l2;
    if t < 0.0 {
        *q
    } else if t > 1.0 {
        *r
    } else {
        Point2D::new(q.x + t * (r.x - q.x), q.y + t * (r.y - q.y))
    }
}

/// Whether segments `ab` and `cd` cross strictly in their interiors.
///
/// Parallel or colinear segments (zero denominator) never cross, and an
/// intersection landing exactly on an endpoint (zero numerator, or a
/// parameter of exactly 0 or 1) does not count. Segments that merely touch
/// at a shared vertex therefore do not block each other, which is what the
/// line-of-sight test requires.
///
/// # Example
/// ```
/// use walkmap::core::{math::segments_cross, Point2D};
///
/// let a = Point2D::new(0.0, 0.0);
/// let b = Point2D::new(2.0, 2.0);
/// let c = Point2D::new(0.0, 2.0);
/// let d = Point2D::new(2.0, 0.0);
/// assert!(segments_cross(&a, &b, &c, &d));
///
/// // Sharing only the endpoint `b` is not a crossing.
/// assert!(!segments_cross(&a, &b, &b, &d));
/// ```
pub fn segments_cross(a: &Point2D, b: &Point2D, c: &Point2D, d: &Point2D) -> bool {
    let denominator = (b.x - a.x) * (d.y - c.y) - (b.y - a.y) * (d.x - c.x);
    if denominator == 0.0 {
        return false;
    }

    let numerator1 = (a.y - c.y) * (d.x - c.x) - (a.x - c.x) * (d.y - c.y);
    let numerator2 = (a.y - c.y) * (b.x - a.x) - (a.x - c.x) * (b.y - a.y);
    if numerator1 == 0.0 || numerator2 == 0.0 {
        return false;
    }

    let r = numerator1 / denominator;
    let s = numerator2 / denominator;
    r > 0.0 && r < 1.0 && s > 0.0 && s < 1.0
}
