//! Loopy belief propagation over a grid-structured Markov random field of image patches
//!
//! The engine selects, for each cell of a synthesis grid, the most plausible patch
//! from a fixed dictionary, scoring candidates by how well their overlapping
//! borders agree with the candidates of neighboring cells.

#![forbid(unsafe_code)]

/// Inference engine, message schedules and potential functions
pub mod algorithm;
/// Input/output operations and error handling
pub mod io;
/// Markov random field data structures: patches, messages and latent nodes
pub mod mrf;

pub use io::error::{InferenceError, Result};
