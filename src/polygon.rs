//! Polygon representation for walkable areas and obstacles.
//!
//! A [`Polygon`] is an ordered vertex ring. The vertex classification used
//! by the visibility graph (convex vs. reflex) is only meaningful for a
//! clockwise winding, so callers reorient with [`Polygon::ensure_clockwise`]
//! before classifying vertices; supplied counter-clockwise rings are simply
//! reversed in place.

use serde::{Deserialize, Serialize};

use crate::core::math::{distance_to_segment_squared, project_onto_segment, BOUNDARY_EPSILON};
use crate::core::Point2D;

/// A polygon vertex: a position plus an optional caller-owned tag.
///
/// The tag is opaque bookkeeping (for example an index into host-side
/// per-point metadata). The geometry and pathfinding code never interprets
/// it; it is carried through to the [`GraphNode`](crate::graph::GraphNode)s
/// and waypoints derived from this vertex.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolygonVertex {
    /// Vertex position.
    pub point: Point2D,
    /// Opaque caller identifier, if any.
    #[serde(default)]
    pub tag: Option<usize>,
}

impl PolygonVertex {
    /// Create an untagged vertex.
    #[inline]
    pub fn new(point: Point2D) -> Self {
        Self { point, tag: None }
    }

    /// Create a vertex carrying a caller tag.
    #[inline]
    pub fn with_tag(point: Point2D, tag: usize) -> Self {
        Self {
            point,
            tag: Some(tag),
        }
    }
}

impl From<Point2D> for PolygonVertex {
    #[inline]
    fn from(point: Point2D) -> Self {
        PolygonVertex::new(point)
    }
}

/// Error constructing a [`Polygon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolygonError {
    /// A polygon needs at least 3 vertices to bound an area.
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },
}

impl std::fmt::Display for PolygonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolygonError::TooFewVertices { count } => {
                write!(f, "polygon needs at least 3 vertices, got {}", count)
            }
        }
    }
}

impl std::error::Error for PolygonError {}

/// An ordered vertex ring bounding a walkable area or an obstacle.
///
/// Consecutive vertices are connected by edges, with an implicit closing
/// edge from the last vertex back to the first.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<PolygonVertex>,
}

impl Polygon {
    /// Create a polygon from a vertex ring.
    ///
    /// # Errors
    /// Returns [`PolygonError::TooFewVertices`] for fewer than 3 vertices.
    pub fn new(vertices: Vec<PolygonVertex>) -> Result<Self, PolygonError> {
        if vertices.len() < 3 {
            return Err(PolygonError::TooFewVertices {
                count: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }

    /// Create a polygon from untagged points.
    ///
    /// # Errors
    /// Returns [`PolygonError::TooFewVertices`] for fewer than 3 points.
    pub fn from_points<I>(points: I) -> Result<Self, PolygonError>
    where
        I: IntoIterator<Item = Point2D>,
    {
        Self::new(points.into_iter().map(PolygonVertex::new).collect())
    }

    /// The vertex ring.
    #[inline]
    pub fn vertices(&self) -> &[PolygonVertex] {
        &self.vertices
    }

    /// Number of vertices (and edges) in the ring.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the vertex ring is wound clockwise.
    ///
    /// Uses the signed-area-style sum `Σ (b.x - a.x)(b.y + a.y)` over
    /// consecutive vertex pairs; a positive sum means clockwise. Reversing
    /// the ring flips the result.
    pub fn is_clockwise(&self) -> bool {
        let mut sum = 0.0;
        for i in 0..self.vertices.len() {
            let a = self.vertices[i].point;
            let b = self.vertices[(i + 1) % self.vertices.len()].point;
            sum += (b.x - a.x) * (b.y + a.y);
        }
        sum > 0.0
    }

    /// Reverse the vertex ring in place.
    #[inline]
    pub fn reverse(&mut self) {
        self.vertices.reverse();
    }

    /// Reverse the ring in place if it is not already clockwise.
    #[inline]
    pub fn ensure_clockwise(&mut self) {
        if !self.is_clockwise() {
            self.reverse();
        }
    }

    /// Whether `point` lies inside the polygon, by the even-odd rule.
    ///
    /// Points within [`BOUNDARY_EPSILON`] of an edge are ambiguous under a
    /// raycast, so they short-circuit to `tolerance_on_outside` instead of
    /// computing parity: pass `true` to count the boundary as inside (the
    /// walkable-area reading) or `false` to count it as outside (the
    /// obstacle reading).
    pub fn contains(&self, point: &Point2D, tolerance_on_outside: bool) -> bool {
        let mut inside = false;

        let mut old = self.vertices[self.vertices.len() - 1].point;
        let mut old_sq_dist = old.distance_squared(point);

        for vertex in &self.vertices {
            let new = vertex.point;
            let new_sq_dist = new.distance_squared(point);

            // Degenerate-triangle check: the point lies (within tolerance)
            // on the edge between `old` and `new`.
            if old_sq_dist + new_sq_dist + 2.0 * (old_sq_dist * new_sq_dist).sqrt()
                - new.distance_squared(&old)
                < BOUNDARY_EPSILON
            {
                return tolerance_on_outside;
            }

            let (left, right) = if new.x > old.x { (old, new) } else { (new, old) };

            if left.x < point.x
                && point.x <= right.x
                && (point.y - left.y) * (right.x - left.x)
                    < (right.y - left.y) * (point.x - left.x)
            {
                inside = !inside;
            }

            old = new;
            old_sq_dist = new_sq_dist;
        }

        inside
    }

    /// Closest point to `point` on the polygon's boundary.
    ///
    /// Scans every edge for the one at minimum distance, then returns the
    /// clamped projection onto that edge.
    pub fn closest_point_on_edge(&self, point: &Point2D) -> Point2D {
        let n = self.vertices.len();
        let mut best = (0, 1 % n);
        let mut min_sq_dist = f32::MAX;

        for i in 0..n {
            let j = (i + 1) % n;
            let sq_dist = distance_to_segment_squared(
                point,
                &self.vertices[i].point,
                &self.vertices[j].point,
            );
            if sq_dist < min_sq_dist {
                min_sq_dist = sq_dist;
                best = (i, j);
            }
        }

        project_onto_segment(
            point,
            &self.vertices[best.0].point,
            &self.vertices[best.1].point,
        )
    }

    /// Whether the vertex at `index` is convex.
    ///
    /// Cross product of the incoming and outgoing edge vectors; negative
    /// means convex for a clockwise-wound ring. Colinear vertices count as
    /// non-convex. Call [`ensure_clockwise`](Self::ensure_clockwise) first:
    /// on a counter-clockwise ring the classification inverts.
    pub fn is_vertex_convex(&self, index: usize) -> bool {
        let n = self.vertices.len();
        let current = self.vertices[index].point;
        let next = self.vertices[(index + 1) % n].point;
        let previous = self.vertices[if index == 0 { n - 1 } else { index - 1 }].point;

        let incoming = current - previous;
        let outgoing = next - current;
        incoming.cross(&outgoing) < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> Polygon {
        // Clockwise in a Y-up frame.
        Polygon::from_points([
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 0.0),
        ])
        .unwrap()
    }

    fn l_shape() -> Polygon {
        // Clockwise; (5, 5) is the single reflex corner.
        Polygon::from_points([
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 5.0),
            Point2D::new(5.0, 5.0),
            Point2D::new(5.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_too_few_vertices() {
        let err = Polygon::from_points([Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)])
            .unwrap_err();
        assert_eq!(err, PolygonError::TooFewVertices { count: 2 });
    }

    #[test]
    fn test_orientation() {
        let mut polygon = square();
        assert!(polygon.is_clockwise());

        polygon.reverse();
        assert!(!polygon.is_clockwise());

        polygon.ensure_clockwise();
        assert!(polygon.is_clockwise());
    }

    #[test]
    fn test_contains_interior_and_exterior() {
        let polygon = square();
        assert!(polygon.contains(&Point2D::new(5.0, 5.0), false));
        assert!(polygon.contains(&Point2D::new(0.5, 9.5), false));
        assert!(!polygon.contains(&Point2D::new(-1.0, 5.0), false));
        assert!(!polygon.contains(&Point2D::new(5.0, 11.0), false));
    }

    #[test]
    fn test_contains_boundary_tolerance() {
        let polygon = square();
        let on_edge = Point2D::new(0.0, 5.0);
        assert!(polygon.contains(&on_edge, true));
        assert!(!polygon.contains(&on_edge, false));
    }

    #[test]
    fn test_contains_l_shape_notch() {
        let polygon = l_shape();
        // The notch cut out of the L is outside.
        assert!(!polygon.contains(&Point2D::new(7.5, 2.5), false));
        assert!(polygon.contains(&Point2D::new(2.5, 2.5), false));
        assert!(polygon.contains(&Point2D::new(7.5, 7.5), false));
    }

    #[test]
    fn test_closest_point_on_edge() {
        let polygon = square();

        let snapped = polygon.closest_point_on_edge(&Point2D::new(-3.0, 5.0));
        assert_relative_eq!(snapped.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(snapped.y, 5.0, epsilon = 1e-6);

        // Beyond a corner the projection clamps to the corner itself.
        let corner = polygon.closest_point_on_edge(&Point2D::new(-2.0, -3.0));
        assert_relative_eq!(corner.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(corner.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_square_corners_are_convex() {
        let polygon = square();
        for i in 0..polygon.vertex_count() {
            assert!(polygon.is_vertex_convex(i), "corner {} should be convex", i);
        }
    }

    #[test]
    fn test_l_shape_reflex_corner() {
        let polygon = l_shape();
        for i in 0..polygon.vertex_count() {
            let convex = polygon.is_vertex_convex(i);
            if i == 4 {
                assert!(!convex, "(5, 5) is reflex");
            } else {
                assert!(convex, "corner {} should be convex", i);
            }
        }
    }

    #[test]
    fn test_classification_inverts_on_reversed_ring() {
        let mut polygon = square();
        polygon.reverse();
        for i in 0..polygon.vertex_count() {
            assert!(!polygon.is_vertex_convex(i));
        }
    }

    #[test]
    fn test_vertex_tags_preserved() {
        let polygon = Polygon::new(vec![
            PolygonVertex::with_tag(Point2D::new(0.0, 0.0), 7),
            PolygonVertex::new(Point2D::new(0.0, 1.0)),
            PolygonVertex::new(Point2D::new(1.0, 1.0)),
        ])
        .unwrap();
        assert_eq!(polygon.vertices()[0].tag, Some(7));
        assert_eq!(polygon.vertices()[1].tag, None);
    }
}
