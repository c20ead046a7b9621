//! Message-passing schedules over the grid graph
//!
//! A schedule decides which directed edges a sweep updates and in what
//! order. The default is a randomized spanning tree: information flows along
//! a different tree shape every iteration, which saturates the loopy graph
//! faster than a fixed ordering. The schedule is a trait so deterministic or
//! flooding alternatives can be compared without touching the update math.

use crate::mrf::direction::Direction;
use crate::mrf::node::LatentNode;
use bitvec::prelude::*;
use rand::Rng;
use rand::rngs::StdRng;

/// One tree edge: a node and the direction toward the node added through it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeEdge {
    /// Index of the node already in the tree when the edge was recorded
    pub node: usize,
    /// Direction from `node` to the neighbor the edge attached
    pub direction: Direction,
}

/// Produces the ordered edge list driving one message-passing sweep
pub trait SweepSchedule {
    /// Build the edge list for the next sweep
    ///
    /// Edges must be ordered root-first so that iterating in reverse visits
    /// leaves before their parents.
    fn edges(&mut self, nodes: &[LatentNode], rng: &mut StdRng) -> Vec<TreeEdge>;
}

/// Randomized spanning tree over the connected grid graph
///
/// Picks a uniformly random start node, then repeatedly swap-removes a
/// uniformly random node from the frontier of visited-but-unexpanded nodes
/// and records an edge per unvisited neighbor. Both the start node and the
/// expansion order are randomized, so this is not a canonical BFS or DFS.
/// The grid is always connected, so the result spans every node with exactly
/// `node_count - 1` edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSpanningTree;

impl SweepSchedule for RandomSpanningTree {
    fn edges(&mut self, nodes: &[LatentNode], rng: &mut StdRng) -> Vec<TreeEdge> {
        if nodes.is_empty() {
            return Vec::new();
        }

        let node_count = nodes.len();
        let mut edges = Vec::with_capacity(node_count - 1);

        let first = rng.random_range(0..node_count);
        let mut frontier = vec![first];
        let mut visited = bitvec![0; node_count];
        visited.set(first, true);

        while !frontier.is_empty() {
            let position = rng.random_range(0..frontier.len());
            let current = frontier.swap_remove(position);

            for direction in Direction::ALL {
                let Some(neighbour) = nodes
                    .get(current)
                    .and_then(|node| node.neighbour(direction))
                else {
                    continue;
                };
                if visited.get(neighbour).as_deref() == Some(&true) {
                    continue;
                }
                frontier.push(neighbour);
                edges.push(TreeEdge {
                    node: current,
                    direction,
                });
                visited.set(neighbour, true);
            }
        }

        edges
    }
}
