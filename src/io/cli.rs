//! Command-line interface for running inference over text matrix files

use crate::algorithm::engine::{EngineParams, LoopyEngine};
use crate::io::configuration::{DEFAULT_ITERATIONS, DEFAULT_SEED, DEFAULT_TWO_SIGMA_SQUARED};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::render_map_image;
use crate::io::matrix::{read_matrix, write_matrix};
use crate::io::progress::SweepProgress;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loopypatch")]
#[command(
    author,
    version,
    about = "Approximate patch-grid inference via loopy belief propagation"
)]
/// Command-line arguments for the inference tool
pub struct Cli {
    /// Dictionary matrix: one row of `patch_size²` pixel values per patch
    #[arg(value_name = "DICTIONARY")]
    pub dictionary: PathBuf,

    /// Candidate matrix: one row of k dictionary indices per grid cell
    #[arg(value_name = "CANDIDATES")]
    pub candidates: PathBuf,

    /// Prior matrix: one row of k probabilities per grid cell
    #[arg(value_name = "PRIORS")]
    pub priors: PathBuf,

    /// Output path for the posterior probability matrix
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Number of grid rows
    #[arg(short = 'R', long)]
    pub rows: usize,

    /// Number of grid columns
    #[arg(short = 'C', long)]
    pub cols: usize,

    /// Patch edge length in pixels
    #[arg(short, long)]
    pub patch_size: usize,

    /// Overlap strip width in pixels, smaller than the patch size
    #[arg(short, long)]
    pub overlap: usize,

    /// Number of candidate patches considered per grid cell
    #[arg(short)]
    pub k: usize,

    /// Temperature of the exponential potential
    #[arg(short, long, default_value_t = DEFAULT_TWO_SIGMA_SQUARED)]
    pub two_sigma2: f64,

    /// Number of message-passing sweeps
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Random seed for the spanning-tree schedule
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Render the maximum a posteriori patch assembly to a PNG
    #[arg(long, value_name = "PNG")]
    pub render: Option<PathBuf>,
}

/// Loads the input matrices, runs the engine and writes the posteriors
pub struct InferenceRunner {
    cli: Cli,
}

impl InferenceRunner {
    /// Create a runner from parsed CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run one full inference: load, validate, sweep, export
    ///
    /// # Errors
    ///
    /// Returns an error when parameter validation, matrix loading, the
    /// inference itself or result export fails. All validation happens
    /// before the first sweep, so no partial results are written.
    pub fn process(&self) -> Result<()> {
        let cli = &self.cli;

        if cli.iterations == 0 {
            return Err(invalid_parameter(
                "iterations",
                &cli.iterations,
                &"at least one sweep is required",
            ));
        }
        if cli.k == 0 {
            return Err(invalid_parameter(
                "k",
                &cli.k,
                &"each node needs at least one candidate",
            ));
        }

        let params = EngineParams {
            grid_rows: cli.rows,
            grid_cols: cli.cols,
            patch_size: cli.patch_size,
            overlap_width: cli.overlap,
            two_sigma_squared: cli.two_sigma2,
            seed: cli.seed,
        };
        params.validate()?;

        let dictionary = read_matrix::<i32>(&cli.dictionary, cli.patch_size * cli.patch_size)?;
        let candidates = read_matrix::<usize>(&cli.candidates, cli.k)?;
        let priors = read_matrix::<f64>(&cli.priors, cli.k)?;

        let mut engine = LoopyEngine::new(params, &dictionary, &candidates, &priors)?;

        let progress = SweepProgress::new(cli.iterations, cli.quiet);
        for _ in 0..cli.iterations {
            engine.execute_sweep()?;
            progress.advance();
        }
        progress.finish();

        let posteriors = engine.posteriors()?;
        write_matrix(&cli.output, &posteriors)?;

        if let Some(render_path) = &cli.render {
            render_map_image(
                &dictionary,
                &candidates,
                &posteriors,
                cli.rows,
                cli.cols,
                cli.patch_size,
                cli.overlap,
                render_path,
            )?;
        }

        Ok(())
    }
}
