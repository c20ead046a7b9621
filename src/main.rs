//! CLI entry point for patch-grid loopy belief propagation

use clap::Parser;
use loopypatch::io::cli::{Cli, InferenceRunner};

fn main() -> loopypatch::Result<()> {
    let cli = Cli::parse();
    let runner = InferenceRunner::new(cli);
    runner.process()
}
