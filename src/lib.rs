//! # Walkmap: Polygonal Walkable-Area Pathfinding
//!
//! A pathfinding library for point-and-click games: the walkable region is
//! a polygon punctured by polygonal obstacle holes, and queries return the
//! shortest walkable path between two points as a waypoint list.
//!
//! ## Quick Start
//!
//! ```rust
//! use walkmap::{Point2D, Polygon, WalkableMap};
//!
//! // A 10x10 walkable room.
//! let room = Polygon::from_points([
//!     Point2D::new(0.0, 0.0),
//!     Point2D::new(0.0, 10.0),
//!     Point2D::new(10.0, 10.0),
//!     Point2D::new(10.0, 0.0),
//! ])?;
//!
//! let mut map = WalkableMap::new(room);
//! let path = map.find_path(Point2D::new(1.0, 1.0), Point2D::new(9.0, 9.0));
//!
//! assert_eq!(path.waypoints.len(), 2); // unobstructed: straight line
//! # Ok::<(), walkmap::PolygonError>(())
//! ```
//!
//! ## Coordinate Frame
//!
//! Coordinates are world units in a Y-up frame. Polygons are wound
//! clockwise in that frame; rings supplied counter-clockwise are reversed
//! in place before use.
//!
//! ## Architecture
//!
//! - [`core`]: point type and segment primitives
//! - [`polygon`]: polygon rings, orientation, containment, closest-edge
//! - [`graph`]: per-query visibility graph structure
//! - [`pathfinding`]: graph construction and A* search
//! - [`map`]: the caller-owned [`WalkableMap`] context and query entry
//! - [`config`]: constraint flags and YAML map descriptors
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────┐   ┌──────────────────┐
//! │ WalkableMap  │──►│ constraint      │──►│ visibility graph │
//! │ (polygons +  │   │ resolution      │   │ (eligible corners│
//! │  obstacles)  │   │ (snap endpoints)│   │  + line of sight)│
//! └──────────────┘   └─────────────────┘   └────────┬─────────┘
//!                                                   │
//!                                                   ▼
//!                    ┌─────────────────┐   ┌──────────────────┐
//!                    │ PathResult      │◄──│ A* search        │
//!                    │ (waypoints +    │   │ (Euclidean       │
//!                    │  segment lens)  │   │  heuristic)      │
//!                    └─────────────────┘   └──────────────────┘
//! ```
//!
//! Every query recomputes the graph from the map's current polygons, so
//! obstacles can be added, removed, or toggled freely between queries.

pub mod config;
pub mod core;
pub mod graph;
pub mod map;
pub mod pathfinding;
pub mod polygon;

// Re-export main types at crate root
pub use config::{ConfigError, ConstraintConfig, MapDescriptor, ObstacleDescriptor};
pub use self::core::Point2D;
pub use graph::{Graph, GraphEdge, GraphNode};
pub use map::{Obstacle, WalkableMap};
pub use polygon::{Polygon, PolygonError, PolygonVertex};

/// The result of a path query.
///
/// `waypoints` runs from the resolved start to the resolved end inclusive;
/// `segment_lengths[i]` is the length of the leg from `waypoints[i]` to
/// `waypoints[i + 1]`, so there is one fewer length than waypoints.
///
/// An unreachable end produces an empty result (no waypoints at all),
/// which is distinct from the single-waypoint, zero-segment result of a
/// query whose start and end coincide.
#[derive(Clone, Debug, Default)]
pub struct PathResult {
    /// Path waypoints, start to end inclusive.
    pub waypoints: Vec<GraphNode>,
    /// Length of each leg between consecutive waypoints.
    pub segment_lengths: Vec<f32>,
}

impl PathResult {
    /// The empty result: no walkable path exists.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no path was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Total path length (0 for empty or single-waypoint results).
    pub fn total_length(&self) -> f32 {
        self.segment_lengths.iter().sum()
    }

    /// Waypoint positions, without tags.
    pub fn points(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.waypoints.iter().map(|node| node.position)
    }

    /// First waypoint (the resolved start), if any.
    pub fn start(&self) -> Option<&GraphNode> {
        self.waypoints.first()
    }

    /// Last waypoint (the resolved end), if any.
    pub fn end(&self) -> Option<&GraphNode> {
        self.waypoints.last()
    }
}
