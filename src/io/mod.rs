//! Input/output operations and error handling
//!
//! Everything outside the inference core lives here: the error taxonomy,
//! whitespace-separated matrix files, the command-line interface, progress
//! display and the optional posterior rendering.

/// Command-line interface and run orchestration
pub mod cli;
/// Runtime configuration defaults
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// Rendering of the maximum a posteriori patch assembly
pub mod image;
/// Whitespace-separated text matrix reading and writing
pub mod matrix;
/// Sweep progress display
pub mod progress;
