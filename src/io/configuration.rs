//! Runtime configuration defaults for the inference CLI

/// Fixed seed for reproducible spanning-tree randomization
pub const DEFAULT_SEED: u64 = 42;

/// Default number of message-passing sweeps
pub const DEFAULT_ITERATIONS: usize = 10;

/// Default temperature of the exponential potential
pub const DEFAULT_TWO_SIGMA_SQUARED: f64 = 0.1;

/// Progress bar template for sweep tracking
pub const SWEEP_PROGRESS_TEMPLATE: &str =
    "[{elapsed_precise}] Sweeps: [{bar:40.cyan/blue}] {pos}/{len}";
