//! A* shortest-path search over a visibility graph.
//!
//! The heuristic is the Euclidean distance to the end node, which is
//! admissible (and consistent) because every graph edge is a straight
//! segment, so the first time the end node is popped its cost is optimal.

use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::{Graph, END_INDEX, START_INDEX};

/// Heap entry ordered by lowest f-cost.
#[derive(Clone, Copy, Debug)]
struct OpenNode {
    index: usize,
    f_cost: f32,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find the shortest node-index path from [`START_INDEX`] to [`END_INDEX`].
///
/// Returns the node indices along the path, start and end inclusive, or an
/// empty vector when the end node is unreachable (disconnected graph).
pub fn find_shortest_path(graph: &Graph) -> Vec<usize> {
    let n = graph.node_count();
    let end_position = graph.end().position;

    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut g_score = vec![f32::INFINITY; n];
    let mut closed = vec![false; n];

    g_score[START_INDEX] = 0.0;

    let mut open_set = BinaryHeap::new();
    open_set.push(OpenNode {
        index: START_INDEX,
        f_cost: graph.start().position.distance(&end_position),
    });

    while let Some(current) = open_set.pop() {
        if current.index == END_INDEX {
            let path = reconstruct_path(&came_from);
            trace!(
                "[AStar] path found: {} nodes, cost {:.3}",
                path.len(),
                g_score[END_INDEX]
            );
            return path;
        }

        if closed[current.index] {
            continue;
        }
        closed[current.index] = true;

        let current_position = graph.nodes()[current.index].position;

        for &neighbor in graph.neighbors(current.index) {
            if closed[neighbor] {
                continue;
            }

            let neighbor_position = graph.nodes()[neighbor].position;
            let tentative_g =
                g_score[current.index] + current_position.distance(&neighbor_position);

            if tentative_g < g_score[neighbor] {
                came_from[neighbor] = Some(current.index);
                g_score[neighbor] = tentative_g;
                open_set.push(OpenNode {
                    index: neighbor,
                    f_cost: tentative_g + neighbor_position.distance(&end_position),
                });
            }
        }
    }

    debug!("[AStar] open set exhausted, end node unreachable");
    Vec::new()
}

/// Walk `came_from` backwards from the end node, then reverse.
fn reconstruct_path(came_from: &[Option<usize>]) -> Vec<usize> {
    let mut path = vec![END_INDEX];
    let mut current = END_INDEX;

    while current != START_INDEX {
        match came_from[current] {
            Some(previous) => {
                current = previous;
                path.push(current);
            }
            None => return Vec::new(),
        }
    }

    path.reverse();
    path
}
