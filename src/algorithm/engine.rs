//! Loopy belief propagation engine for the patch grid
//!
//! The engine owns the patch dictionary and the latent node arena, computes
//! pairwise potentials on demand from border overlaps, and drives
//! randomized-tree message-passing sweeps until the caller reads off the
//! per-node marginal posteriors.

use crate::algorithm::potential::{ExponentialPotential, PotentialFn};
use crate::algorithm::schedule::{RandomSpanningTree, SweepSchedule};
use crate::io::error::{InferenceError, Result, computation_error, invalid_parameter};
use crate::mrf::direction::Direction;
use crate::mrf::message::Message;
use crate::mrf::node::{LatentNode, build_grid};
use crate::mrf::patch::{DictionaryPatch, prepare_dictionary};
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Scalar parameters of an inference run
#[derive(Clone, Copy, Debug)]
pub struct EngineParams {
    /// Number of grid rows
    pub grid_rows: usize,
    /// Number of grid columns
    pub grid_cols: usize,
    /// Patch edge length in pixels
    pub patch_size: usize,
    /// Width of the overlap strips, strictly between 0 and `patch_size`
    pub overlap_width: usize,
    /// Temperature of the exponential potential
    pub two_sigma_squared: f64,
    /// Seed for the spanning-tree randomization
    pub seed: u64,
}

impl EngineParams {
    /// Check every scalar constraint, reporting the first that fails
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::InvalidParameter`] naming the offending
    /// parameter when a constraint is violated.
    pub fn validate(&self) -> Result<()> {
        if self.grid_rows == 0 {
            return Err(invalid_parameter(
                "grid_rows",
                &self.grid_rows,
                &"must be positive",
            ));
        }
        if self.grid_cols == 0 {
            return Err(invalid_parameter(
                "grid_cols",
                &self.grid_cols,
                &"must be positive",
            ));
        }
        if self.patch_size < 2 {
            return Err(invalid_parameter(
                "patch_size",
                &self.patch_size,
                &"must be at least 2 to leave room for an overlap strip",
            ));
        }
        if self.overlap_width == 0 || self.overlap_width >= self.patch_size {
            return Err(invalid_parameter(
                "overlap_width",
                &self.overlap_width,
                &"must be strictly between 0 and patch_size",
            ));
        }
        if !(self.two_sigma_squared > 0.0 && self.two_sigma_squared.is_finite()) {
            return Err(invalid_parameter(
                "two_sigma_squared",
                &self.two_sigma_squared,
                &"must be a positive finite number",
            ));
        }
        Ok(())
    }
}

/// Approximate marginal inference over the patch grid via loopy belief
/// propagation
///
/// Construction validates all inputs up front; afterwards the life cycle is
/// simply "execute sweeps, then read posteriors".
pub struct LoopyEngine {
    params: EngineParams,
    dictionary: Vec<DictionaryPatch>,
    nodes: Vec<LatentNode>,
    potential: Box<dyn PotentialFn>,
    schedule: Box<dyn SweepSchedule>,
    rng: StdRng,
    sweeps_executed: usize,
}

impl LoopyEngine {
    /// Build an engine from validated inputs
    ///
    /// `dictionary_pixels` holds one flattened `patch_size²` pixel row per
    /// dictionary patch; `candidates` and `priors` hold one row of `k`
    /// entries per grid cell, in `row * cols + col` order.
    ///
    /// # Errors
    ///
    /// Returns an error before any state is built when a scalar parameter is
    /// out of range, when the matrix shapes disagree with the parameters or
    /// each other, or when a candidate index falls outside the dictionary.
    pub fn new(
        params: EngineParams,
        dictionary_pixels: &Array2<i32>,
        candidates: &Array2<usize>,
        priors: &Array2<f64>,
    ) -> Result<Self> {
        params.validate()?;

        let patch_pixels = params.patch_size * params.patch_size;
        if dictionary_pixels.ncols() != patch_pixels {
            return Err(InferenceError::DimensionMismatch {
                matrix: "dictionary",
                expected: format!("{patch_pixels} columns (patch_size²)"),
                actual: format!("{} columns", dictionary_pixels.ncols()),
            });
        }

        // Border distances assume 8-bit grayscale; out-of-range values would
        // also overflow the squared-difference arithmetic.
        for &value in dictionary_pixels {
            if !(0..=255).contains(&value) {
                return Err(InferenceError::InvalidPixelValue { value });
            }
        }

        if candidates.dim() != priors.dim() {
            return Err(InferenceError::DimensionMismatch {
                matrix: "priors",
                expected: format!("{:?} (shape of the candidate matrix)", candidates.dim()),
                actual: format!("{:?}", priors.dim()),
            });
        }

        let node_count = params.grid_rows * params.grid_cols;
        if candidates.nrows() != node_count {
            return Err(InferenceError::DimensionMismatch {
                matrix: "candidates",
                expected: format!("{node_count} rows (grid_rows × grid_cols)"),
                actual: format!("{} rows", candidates.nrows()),
            });
        }

        if candidates.ncols() == 0 {
            return Err(invalid_parameter(
                "k",
                &candidates.ncols(),
                &"each node needs at least one candidate",
            ));
        }

        let dictionary_size = dictionary_pixels.nrows();
        for &index in candidates {
            if index >= dictionary_size {
                return Err(InferenceError::InvalidPatchIndex {
                    index,
                    dictionary_size,
                });
            }
        }

        let dictionary =
            prepare_dictionary(dictionary_pixels, params.patch_size, params.overlap_width);
        let nodes = build_grid(params.grid_rows, params.grid_cols, candidates, priors);

        Ok(Self {
            params,
            dictionary,
            nodes,
            potential: Box::new(ExponentialPotential {
                two_sigma_squared: params.two_sigma_squared,
            }),
            schedule: Box::new(RandomSpanningTree),
            rng: StdRng::seed_from_u64(params.seed),
            sweeps_executed: 0,
        })
    }

    /// Replace the potential function
    #[must_use]
    pub fn with_potential(mut self, potential: Box<dyn PotentialFn>) -> Self {
        self.potential = potential;
        self
    }

    /// Replace the sweep schedule
    #[must_use]
    pub fn with_schedule(mut self, schedule: Box<dyn SweepSchedule>) -> Self {
        self.schedule = schedule;
        self
    }

    /// The run parameters the engine was built with
    pub const fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Number of latent nodes in the grid
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Candidate count per node
    pub fn k(&self) -> usize {
        self.nodes.first().map_or(0, LatentNode::k)
    }

    /// Number of completed sweeps
    pub const fn sweeps_executed(&self) -> usize {
        self.sweeps_executed
    }

    /// Sum-product update for one directed edge
    ///
    /// `direction` points from the sender toward the receiver. For each
    /// receiver candidate the sender's candidates contribute
    /// `prior × potential(border distance) × product of the sender's other
    /// incoming messages`; the incoming message from the receiver itself is
    /// excluded so no information flows back to its source.
    fn compute_message(
        &self,
        sender: &LatentNode,
        receiver: &LatentNode,
        direction: Direction,
    ) -> Result<Message> {
        let incoming_product = sender.product_of_received(Some(direction));

        let mut elements = vec![0.0_f64; receiver.k()];
        for (j, element) in elements.iter_mut().enumerate() {
            let Some(&receiver_index) = receiver.candidates.get(j) else {
                continue;
            };
            let receiver_patch = self.patch(receiver_index)?;

            for i in 0..sender.k() {
                let Some(&sender_index) = sender.candidates.get(i) else {
                    continue;
                };
                let sender_patch = self.patch(sender_index)?;

                let distance = sender_patch.overlap_distance(receiver_patch, direction);
                let prior = sender.priors.get(i).copied().unwrap_or(0.0);
                let incoming = incoming_product.elements().get(i).copied().unwrap_or(0.0);

                *element += prior * self.potential.potential(distance) * incoming;
            }
        }

        let mut message = Message::from_elements(elements);
        message.normalize_sum()?;
        Ok(message)
    }

    fn patch(&self, index: usize) -> Result<&DictionaryPatch> {
        self.dictionary
            .get(index)
            .ok_or(InferenceError::InvalidPatchIndex {
                index,
                dictionary_size: self.dictionary.len(),
            })
    }

    /// Execute one randomized-tree message-passing sweep
    ///
    /// Builds a fresh schedule, then updates messages in two passes: the edge
    /// list in reverse order carries messages from the leaves toward the
    /// root, the forward order carries them back out to the leaves. Message
    /// slots not on this sweep's tree keep their previous value; repeated
    /// sweeps with differently shaped trees saturate the whole graph.
    ///
    /// # Errors
    ///
    /// Returns a degenerate-distribution error if a message normalization
    /// collapses to zero, aborting the sweep.
    pub fn execute_sweep(&mut self) -> Result<()> {
        let edges = self.schedule.edges(&self.nodes, &mut self.rng);

        for edge in edges.iter().rev() {
            let Some(receiver_node) = self.nodes.get(edge.node) else {
                continue;
            };
            let Some(sender) = receiver_node.neighbour(edge.direction) else {
                continue;
            };
            let Some(sender_node) = self.nodes.get(sender) else {
                continue;
            };

            let message =
                self.compute_message(sender_node, receiver_node, edge.direction.opposite())?;
            if let Some(node) = self.nodes.get_mut(edge.node) {
                node.set_received(edge.direction, message);
            }
        }

        for edge in &edges {
            let Some(sender_node) = self.nodes.get(edge.node) else {
                continue;
            };
            let Some(receiver) = sender_node.neighbour(edge.direction) else {
                continue;
            };
            let Some(receiver_node) = self.nodes.get(receiver) else {
                continue;
            };

            let message = self.compute_message(sender_node, receiver_node, edge.direction)?;
            if let Some(node) = self.nodes.get_mut(receiver) {
                node.set_received(edge.direction.opposite(), message);
            }
        }

        self.sweeps_executed += 1;
        Ok(())
    }

    /// Current marginal posterior of every node, one row per grid cell
    ///
    /// # Errors
    ///
    /// Returns a degenerate-distribution error when a node's unnormalized
    /// posterior sums to zero.
    pub fn posteriors(&self) -> Result<Array2<f64>> {
        let k = self.k();
        let mut flat = Vec::with_capacity(self.nodes.len() * k);
        for node in &self.nodes {
            flat.extend(node.posterior()?);
        }
        Array2::from_shape_vec((self.nodes.len(), k), flat)
            .map_err(|error| computation_error("posterior assembly", &error))
    }

    /// Run `iterations` sweeps and return the final posteriors
    ///
    /// # Errors
    ///
    /// Propagates the first sweep or normalization failure.
    pub fn run(&mut self, iterations: usize) -> Result<Array2<f64>> {
        for _ in 0..iterations {
            self.execute_sweep()?;
        }
        self.posteriors()
    }
}
