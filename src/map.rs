//! Walkable-area map and the path query entry point.
//!
//! A [`WalkableMap`] owns the main walkable polygon, the obstacle holes
//! punched into it, and the constraint flags applied to query endpoints.
//! It persists across queries and may be mutated between them (obstacles
//! added, removed or toggled); every call to
//! [`find_path`](WalkableMap::find_path) recomputes from scratch.

use log::{debug, trace};

use crate::config::ConstraintConfig;
use crate::core::math::BOUNDARY_EPSILON;
use crate::core::Point2D;
use crate::graph::GraphNode;
use crate::pathfinding::{astar, visibility};
use crate::polygon::Polygon;
use crate::PathResult;

/// An obstacle: a polygonal hole in the walkable area plus an enable flag.
///
/// Disabled obstacles are ignored by queries entirely: their vertices are
/// not graph nodes, their edges do not block line of sight, and the
/// constraint resolver does not project out of them.
#[derive(Clone, Debug)]
pub struct Obstacle {
    /// The obstacle outline.
    pub polygon: Polygon,
    /// Whether the obstacle participates in queries.
    pub enabled: bool,
}

impl Obstacle {
    /// Create an enabled obstacle.
    #[inline]
    pub fn new(polygon: Polygon) -> Self {
        Self {
            polygon,
            enabled: true,
        }
    }

    /// Create a disabled obstacle.
    #[inline]
    pub fn disabled(polygon: Polygon) -> Self {
        Self {
            polygon,
            enabled: false,
        }
    }
}

/// A walkable-area map: main polygon, obstacles, and constraint flags.
#[derive(Debug)]
pub struct WalkableMap {
    main: Polygon,
    obstacles: Vec<Obstacle>,
    constraints: ConstraintConfig,
}

impl WalkableMap {
    /// Create a map from its main walkable polygon, with no obstacles and
    /// default constraints (all endpoints constrained).
    pub fn new(main: Polygon) -> Self {
        Self {
            main,
            obstacles: Vec::new(),
            constraints: ConstraintConfig::default(),
        }
    }

    /// Builder-style setter for the constraint flags.
    pub fn with_constraints(mut self, constraints: ConstraintConfig) -> Self {
        self.constraints = constraints;
        self
    }

    /// The main walkable polygon.
    #[inline]
    pub fn main(&self) -> &Polygon {
        &self.main
    }

    /// Replace the main walkable polygon.
    pub fn set_main(&mut self, main: Polygon) {
        self.main = main;
    }

    /// The obstacle list.
    #[inline]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Add an enabled obstacle, returning its index.
    pub fn add_obstacle(&mut self, polygon: Polygon) -> usize {
        self.obstacles.push(Obstacle::new(polygon));
        self.obstacles.len() - 1
    }

    /// Mutable access to an obstacle (to toggle or replace it).
    pub fn obstacle_mut(&mut self, index: usize) -> Option<&mut Obstacle> {
        self.obstacles.get_mut(index)
    }

    /// Remove an obstacle by index.
    pub fn remove_obstacle(&mut self, index: usize) -> Option<Obstacle> {
        if index < self.obstacles.len() {
            Some(self.obstacles.remove(index))
        } else {
            None
        }
    }

    /// Enable or disable an obstacle. Returns false for an invalid index.
    pub fn set_obstacle_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.obstacles.get_mut(index) {
            Some(obstacle) => {
                obstacle.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// The constraint flags applied to query endpoints.
    #[inline]
    pub fn constraints(&self) -> &ConstraintConfig {
        &self.constraints
    }

    /// Replace the constraint flags.
    pub fn set_constraints(&mut self, constraints: ConstraintConfig) {
        self.constraints = constraints;
    }

    /// Find the shortest walkable path from `start` to `end`.
    ///
    /// Endpoints violating the map's constraint flags are first projected
    /// onto the nearest legal boundary point; the returned waypoints begin
    /// at the resolved start and finish at the resolved end. An unreachable
    /// end yields an empty result; coincident (resolved) endpoints yield a
    /// single waypoint with no segments.
    ///
    /// Takes `&mut self` because polygons supplied counter-clockwise are
    /// reversed in place before vertex classification.
    pub fn find_path(&mut self, start: Point2D, end: Point2D) -> PathResult {
        trace!(
            "[WalkableMap] query ({:.3}, {:.3}) -> ({:.3}, {:.3})",
            start.x,
            start.y,
            end.x,
            end.y
        );

        self.main.ensure_clockwise();
        for obstacle in &mut self.obstacles {
            if obstacle.enabled {
                obstacle.polygon.ensure_clockwise();
            }
        }

        let constraints = self.constraints;
        let start = self.resolve_endpoint(
            start,
            constraints.constrain_start_to_main,
            constraints.constrain_start_from_obstacles,
        );
        let end = self.resolve_endpoint(
            end,
            constraints.constrain_end_to_main,
            constraints.constrain_end_from_obstacles,
        );

        if start.distance(&end) < BOUNDARY_EPSILON {
            return PathResult {
                waypoints: vec![GraphNode::new(start)],
                segment_lengths: Vec::new(),
            };
        }

        let active: Vec<&Polygon> = self
            .obstacles
            .iter()
            .filter(|obstacle| obstacle.enabled)
            .map(|obstacle| &obstacle.polygon)
            .collect();

        let graph = visibility::build_graph(&self.main, &active, start, end);
        let indices = astar::find_shortest_path(&graph);
        if indices.is_empty() {
            debug!("[WalkableMap] end point unreachable");
            return PathResult::empty();
        }

        let mut waypoints = Vec::with_capacity(indices.len());
        let mut segment_lengths = Vec::with_capacity(indices.len() - 1);
        for (k, &index) in indices.iter().enumerate() {
            let node = graph.nodes()[index];
            if k > 0 {
                let previous = indices[k - 1];
                let length = graph
                    .find_edge(previous, index)
                    .map(|edge| edge.length())
                    .unwrap_or_else(|| {
                        graph.nodes()[previous].position.distance(&node.position)
                    });
                segment_lengths.push(length);
            }
            waypoints.push(node);
        }

        PathResult {
            waypoints,
            segment_lengths,
        }
    }

    /// Project a point onto the nearest legal position.
    ///
    /// Applies the main-polygon constraint first, then scans enabled
    /// obstacles in order and projects out of the first one containing the
    /// point. The result is not re-validated: with overlapping obstacles a
    /// projected point can land inside another obstacle, matching the
    /// one-pass resolution the path query itself performs.
    pub fn resolve_endpoint(
        &self,
        point: Point2D,
        to_main: bool,
        from_obstacles: bool,
    ) -> Point2D {
        let mut resolved = point;

        if to_main && !self.main.contains(&resolved, true) {
            resolved = self.main.closest_point_on_edge(&resolved);
            debug!(
                "[WalkableMap] snapped ({:.3}, {:.3}) to walkable boundary ({:.3}, {:.3})",
                point.x, point.y, resolved.x, resolved.y
            );
        }

        if from_obstacles {
            for obstacle in self.obstacles.iter().filter(|o| o.enabled) {
                if obstacle.polygon.contains(&resolved, true) {
                    resolved = obstacle.polygon.closest_point_on_edge(&resolved);
                    debug!(
                        "[WalkableMap] snapped ({:.3}, {:.3}) out of obstacle to ({:.3}, {:.3})",
                        point.x, point.y, resolved.x, resolved.y
                    );
                    break;
                }
            }
        }

        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_map() -> WalkableMap {
        WalkableMap::new(
            Polygon::from_points([
                Point2D::new(0.0, 0.0),
                Point2D::new(0.0, 10.0),
                Point2D::new(10.0, 10.0),
                Point2D::new(10.0, 0.0),
            ])
            .unwrap(),
        )
    }

    fn centered_obstacle() -> Polygon {
        Polygon::from_points([
            Point2D::new(3.0, 4.0),
            Point2D::new(3.0, 7.0),
            Point2D::new(7.0, 7.0),
            Point2D::new(7.0, 4.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_direct_path_in_empty_map() {
        let mut map = square_map();
        let path = map.find_path(Point2D::new(1.0, 1.0), Point2D::new(9.0, 9.0));

        assert_eq!(path.waypoints.len(), 2);
        assert_eq!(path.segment_lengths.len(), 1);
        assert_relative_eq!(path.total_length(), 128.0_f32.sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn test_same_start_and_end() {
        let mut map = square_map();
        let path = map.find_path(Point2D::new(5.0, 5.0), Point2D::new(5.0, 5.0));

        assert_eq!(path.waypoints.len(), 1);
        assert!(path.segment_lengths.is_empty());
        assert_eq!(path.total_length(), 0.0);
        assert!(!path.is_empty());
    }

    #[test]
    fn test_detour_around_obstacle() {
        let mut map = square_map();
        map.add_obstacle(centered_obstacle());

        let path = map.find_path(Point2D::new(1.0, 1.0), Point2D::new(9.0, 9.0));
        let direct = Point2D::new(1.0, 1.0).distance(&Point2D::new(9.0, 9.0));

        assert!(path.waypoints.len() > 2);
        assert!(path.total_length() > direct);
    }

    #[test]
    fn test_disabled_obstacle_is_ignored() {
        let mut map = square_map();
        let index = map.add_obstacle(centered_obstacle());
        assert!(map.set_obstacle_enabled(index, false));

        let path = map.find_path(Point2D::new(1.0, 1.0), Point2D::new(9.0, 9.0));
        assert_eq!(path.waypoints.len(), 2);

        // Re-enabling restores the detour.
        assert!(map.set_obstacle_enabled(index, true));
        let path = map.find_path(Point2D::new(1.0, 1.0), Point2D::new(9.0, 9.0));
        assert!(path.waypoints.len() > 2);
    }

    #[test]
    fn test_resolve_endpoint_outside_main() {
        let map = square_map();
        let resolved = map.resolve_endpoint(Point2D::new(-2.0, 5.0), true, true);
        assert_relative_eq!(resolved.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(resolved.y, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_resolve_endpoint_inside_obstacle() {
        let mut map = square_map();
        map.add_obstacle(centered_obstacle());

        let resolved = map.resolve_endpoint(Point2D::new(5.0, 4.5), false, true);
        assert_relative_eq!(resolved.y, 4.0, epsilon = 1e-6);
        assert_relative_eq!(resolved.x, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_resolve_endpoint_unconstrained() {
        let map = square_map();
        let outside = Point2D::new(-2.0, 5.0);
        assert_eq!(map.resolve_endpoint(outside, false, false), outside);
    }

    #[test]
    fn test_disabled_obstacle_does_not_constrain() {
        let mut map = square_map();
        let index = map.add_obstacle(centered_obstacle());
        map.set_obstacle_enabled(index, false);

        let inside_obstacle = Point2D::new(5.0, 5.0);
        assert_eq!(
            map.resolve_endpoint(inside_obstacle, true, true),
            inside_obstacle
        );
    }

    #[test]
    fn test_counter_clockwise_input_is_reoriented() {
        let main = Polygon::from_points([
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ])
        .unwrap();
        assert!(!main.is_clockwise());

        let mut map = WalkableMap::new(main.clone());
        let path = map.find_path(Point2D::new(1.0, 1.0), Point2D::new(9.0, 9.0));
        assert_eq!(path.waypoints.len(), 2);
        assert!(map.main().is_clockwise());

        // The standalone polygon is untouched.
        assert!(!main.is_clockwise());
    }

    #[test]
    fn test_remove_obstacle() {
        let mut map = square_map();
        let index = map.add_obstacle(centered_obstacle());
        assert!(map.remove_obstacle(index).is_some());
        assert!(map.remove_obstacle(index).is_none());
        assert!(map.obstacles().is_empty());
    }
}
