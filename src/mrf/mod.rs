//! Markov random field data structures for patch-grid inference
//!
//! This module contains the model-side types of the engine:
//! - Dictionary patches and their overlap border strips
//! - Messages exchanged between neighboring latent nodes
//! - Latent grid nodes and the 4-connected grid graph

/// Grid directions and their geometry
pub mod direction;
/// Probability-like message vectors
pub mod message;
/// Latent grid nodes and grid graph construction
pub mod node;
/// Dictionary patches and border overlap distances
pub mod patch;

pub use direction::Direction;
pub use message::Message;
pub use node::{LatentNode, build_grid};
pub use patch::{DictionaryPatch, prepare_dictionary};
