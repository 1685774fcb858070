//! Visibility graph construction.
//!
//! Nodes are the start and end points plus the polygon vertices that can
//! appear on a shortest path: reflex vertices of the walkable boundary and
//! convex vertices of obstacles. Every node pair with an unobstructed line
//! of sight is connected by an edge.

use log::debug;

use crate::core::math::{distance_to_segment, segments_cross, BOUNDARY_EPSILON};
use crate::core::Point2D;
use crate::graph::{Graph, GraphNode};
use crate::polygon::Polygon;

/// Build the visibility graph for a query.
///
/// `main` and every polygon in `obstacles` must already be wound clockwise
/// (vertex classification depends on it), `obstacles` must contain only the
/// enabled obstacles, and `start`/`end` must already be constraint-resolved.
pub fn build_graph(
    main: &Polygon,
    obstacles: &[&Polygon],
    start: Point2D,
    end: Point2D,
) -> Graph {
    let mut graph = Graph::new(GraphNode::new(start), GraphNode::new(end));

    // Reflex (and colinear) vertices of the walkable boundary are the only
    // main-polygon corners a taut path can bend around.
    for (i, vertex) in main.vertices().iter().enumerate() {
        if !main.is_vertex_convex(i) {
            graph.add_node(GraphNode::from_vertex(vertex));
        }
    }

    // For obstacles it is the convex corners.
    for polygon in obstacles {
        for (i, vertex) in polygon.vertices().iter().enumerate() {
            if polygon.is_vertex_convex(i) {
                graph.add_node(GraphNode::from_vertex(vertex));
            }
        }
    }

    let count = graph.node_count();
    for i in 0..count {
        for j in (i + 1)..count {
            let a = graph.nodes()[i].position;
            let b = graph.nodes()[j].position;
            if line_of_sight(main, obstacles, &a, &b) {
                graph.add_edge(i, j);
            }
        }
    }

    debug!(
        "[VisibilityGraph] built {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}

/// Whether `a` and `b` see each other across the walkable area.
///
/// Three clauses:
/// 1. both points lie inside the main polygon (boundary-tolerant);
/// 2. no edge of the main polygon or an obstacle strictly crosses the
///    segment `ab`, unless the crossing edge passes within
///    [`BOUNDARY_EPSILON`] of `a` or `b` (an endpoint snapped onto that
///    edge by rounding must not block itself);
/// 3. the segment midpoint is inside the main polygon and not strictly
///    inside any obstacle, which rejects segments that run through an
///    obstacle without strictly crossing its edges (e.g. corner to corner
///    across a hole).
pub fn line_of_sight(
    main: &Polygon,
    obstacles: &[&Polygon],
    a: &Point2D,
    b: &Point2D,
) -> bool {
    if !main.contains(a, true) || !main.contains(b, true) {
        return false;
    }

    // Coincident points trivially see each other.
    if a.distance(b) < BOUNDARY_EPSILON {
        return true;
    }

    if crossing_blocks(main, a, b) {
        return false;
    }
    for polygon in obstacles {
        if crossing_blocks(polygon, a, b) {
            return false;
        }
    }

    let midpoint = a.midpoint(b);
    if !main.contains(&midpoint, true) {
        return false;
    }
    for polygon in obstacles {
        if polygon.contains(&midpoint, false) {
            return false;
        }
    }

    true
}

/// Whether any edge of `polygon` blocks the segment `ab`.
fn crossing_blocks(polygon: &Polygon, a: &Point2D, b: &Point2D) -> bool {
    let vertices = polygon.vertices();
    for i in 0..vertices.len() {
        let v1 = vertices[i].point;
        let v2 = vertices[(i + 1) % vertices.len()].point;

        if segments_cross(a, b, &v1, &v2)
            && distance_to_segment(a, &v1, &v2) > BOUNDARY_EPSILON
            && distance_to_segment(b, &v1, &v2) > BOUNDARY_EPSILON
        {
            return true;
        }
    }
    false
}
