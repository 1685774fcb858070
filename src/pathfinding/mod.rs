//! Visibility-graph construction and shortest-path search.
//!
//! [`visibility::build_graph`] turns a walkable polygon, its obstacle
//! holes and a start/end pair into a [`Graph`](crate::graph::Graph);
//! [`astar::find_shortest_path`] searches it. Both are exposed so hosts can
//! inspect or visualize the intermediate graph; the usual entry point is
//! [`WalkableMap::find_path`](crate::map::WalkableMap::find_path).

pub mod astar;
pub mod visibility;
