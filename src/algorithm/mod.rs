/// Core engine owning the patch dictionary and the latent grid
pub mod engine;
/// Pairwise compatibility functions over border distances
pub mod potential;
/// Message-passing schedules over the grid graph
pub mod schedule;
