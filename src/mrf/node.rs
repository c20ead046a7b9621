//! Latent grid nodes and grid graph construction
//!
//! Each latent node is one grid cell whose true patch assignment is inferred.
//! Nodes live in a flat arena indexed by `row * cols + col`; adjacency is an
//! explicit array of four neighbor indices computed once at construction, so
//! the grid graph needs no pointer structures.

use crate::io::error::Result;
use crate::mrf::direction::Direction;
use crate::mrf::message::Message;
use ndarray::Array2;

/// One latent variable of the MRF: its candidates, prior, message slots and
/// neighbor references
#[derive(Clone, Debug)]
pub struct LatentNode {
    /// Dictionary indices of the `k` considered candidate patches
    pub candidates: Vec<usize>,
    /// Prior probability of each candidate, aligned with `candidates`
    pub priors: Vec<f64>,
    /// Most recently received message per direction, identity before any
    /// sweep has touched the slot
    pub received: [Message; 4],
    /// Neighbor node index per direction, `None` at the grid border
    pub neighbours: [Option<usize>; 4],
}

impl LatentNode {
    /// Create an unconnected node from its candidate indices and priors
    pub fn new(candidates: Vec<usize>, priors: Vec<f64>) -> Self {
        let k = candidates.len();
        Self {
            candidates,
            priors,
            received: [
                Message::identity(k),
                Message::identity(k),
                Message::identity(k),
                Message::identity(k),
            ],
            neighbours: [None; 4],
        }
    }

    /// Candidate count, equal to every message length for this node
    pub const fn k(&self) -> usize {
        self.candidates.len()
    }

    /// Neighbor index in the given direction, if any
    pub fn neighbour(&self, direction: Direction) -> Option<usize> {
        self.neighbours.get(direction.index()).copied().flatten()
    }

    /// Number of reachable neighbors
    pub fn degree(&self) -> usize {
        self.neighbours
            .iter()
            .filter(|neighbour| neighbour.is_some())
            .count()
    }

    /// Replace the stored message for one direction
    pub fn set_received(&mut self, direction: Direction, message: Message) {
        if let Some(slot) = self.received.get_mut(direction.index()) {
            *slot = message;
        }
    }

    /// Elementwise product of the received messages, excluding at most one
    /// direction
    ///
    /// Passing `Some(direction)` implements the sum-product exclusion rule:
    /// the message sent toward a neighbor must not depend on what that
    /// neighbor sent here. `None` multiplies all four slots.
    pub fn product_of_received(&self, excluded: Option<Direction>) -> Message {
        let mut product = Message::identity(self.k());
        for direction in Direction::ALL {
            if excluded == Some(direction) {
                continue;
            }
            if let Some(message) = self.received.get(direction.index()) {
                product.multiply(message);
            }
        }
        product
    }

    /// Marginal posterior over the node's candidates
    ///
    /// The product of all four received messages times the prior, normalized
    /// to sum to 1.
    ///
    /// # Errors
    ///
    /// Returns a degenerate-distribution error when the unnormalized
    /// posterior sums to zero.
    pub fn posterior(&self) -> Result<Vec<f64>> {
        let mut product = self.product_of_received(None);
        product.multiply(&Message::from_elements(self.priors.clone()));
        product.normalize_sum()?;
        Ok(product.into_elements())
    }
}

/// Build the latent node arena for a `rows × cols` grid and wire 4-connected
/// adjacency
///
/// Row `i` of the candidate and prior matrices initializes node `i`; nodes
/// are indexed `row * cols + col`. Border cells get `None` neighbors, so
/// corners end up with degree 2, non-corner border cells with degree 3 and
/// interior cells with degree 4.
pub fn build_grid(
    rows: usize,
    cols: usize,
    candidates: &Array2<usize>,
    priors: &Array2<f64>,
) -> Vec<LatentNode> {
    let mut nodes: Vec<LatentNode> = candidates
        .rows()
        .into_iter()
        .zip(priors.rows())
        .map(|(candidate_row, prior_row)| {
            LatentNode::new(candidate_row.to_vec(), prior_row.to_vec())
        })
        .collect();

    for row in 0..rows {
        for col in 0..cols {
            for direction in Direction::ALL {
                let (dr, dc) = direction.offset();
                let neighbour_row = row as i32 + dr;
                let neighbour_col = col as i32 + dc;

                let in_bounds = neighbour_row >= 0
                    && neighbour_row < rows as i32
                    && neighbour_col >= 0
                    && neighbour_col < cols as i32;
                let neighbour =
                    in_bounds.then(|| neighbour_row as usize * cols + neighbour_col as usize);

                if let Some(node) = nodes.get_mut(row * cols + col)
                    && let Some(slot) = node.neighbours.get_mut(direction.index())
                {
                    *slot = neighbour;
                }
            }
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::{LatentNode, build_grid};
    use crate::mrf::direction::Direction;
    use crate::mrf::message::Message;
    use ndarray::Array2;

    fn uniform_grid(rows: usize, cols: usize, k: usize) -> Vec<LatentNode> {
        let candidates = Array2::from_elem((rows * cols, k), 0_usize);
        let priors = Array2::from_elem((rows * cols, k), 1.0 / k as f64);
        build_grid(rows, cols, &candidates, &priors)
    }

    #[test]
    fn test_product_excludes_one_direction() {
        let mut node = LatentNode::new(vec![0, 1], vec![0.5, 0.5]);
        node.set_received(Direction::Top, Message::from_elements(vec![2.0, 1.0]));
        node.set_received(Direction::Right, Message::from_elements(vec![3.0, 1.0]));

        let without_top = node.product_of_received(Some(Direction::Top));
        assert_eq!(without_top.elements(), &[3.0, 1.0]);

        let all = node.product_of_received(None);
        assert_eq!(all.elements(), &[6.0, 1.0]);
    }

    #[test]
    fn test_posterior_multiplies_prior_and_normalizes() {
        let mut node = LatentNode::new(vec![0, 1], vec![0.75, 0.25]);
        node.set_received(Direction::Left, Message::from_elements(vec![1.0, 3.0]));

        let posterior = node.posterior().unwrap_or_default();
        let total: f64 = posterior.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        // 0.75 * 1.0 vs 0.25 * 3.0 normalizes to an even split
        assert!(posterior.iter().all(|&p| (p - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_grid_neighbour_wiring() {
        let nodes = uniform_grid(2, 3, 1);

        let top_left = nodes.first().map(|node| node.neighbours);
        assert_eq!(top_left, Some([None, Some(1), Some(3), None]));

        let center_top = nodes.get(1).map(|node| node.neighbours);
        assert_eq!(center_top, Some([None, Some(2), Some(4), Some(0)]));

        let bottom_right = nodes.get(5).map(|node| node.neighbours);
        assert_eq!(bottom_right, Some([Some(2), None, None, Some(4)]));
    }

    #[test]
    fn test_degree_distribution_on_larger_grid() {
        let rows = 5;
        let cols = 4;
        let nodes = uniform_grid(rows, cols, 1);

        let mut nodes_of_degree = [0_usize; 5];
        for node in &nodes {
            if let Some(count) = nodes_of_degree.get_mut(node.degree()) {
                *count += 1;
            }
        }

        assert_eq!(
            nodes_of_degree,
            [
                0,
                0,
                4,
                2 * (rows - 2) + 2 * (cols - 2),
                (rows - 2) * (cols - 2)
            ]
        );
    }

    #[test]
    fn test_neighbour_relation_is_mutual() {
        let cols = 4;
        let nodes = uniform_grid(3, cols, 1);

        for (index, node) in nodes.iter().enumerate() {
            for direction in Direction::ALL {
                if let Some(neighbour) = node.neighbour(direction) {
                    let back = nodes
                        .get(neighbour)
                        .and_then(|other| other.neighbour(direction.opposite()));
                    assert_eq!(back, Some(index));
                }
            }
        }
    }
}
