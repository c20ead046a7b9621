//! Sweep progress display for long inference runs

use crate::io::configuration::SWEEP_PROGRESS_TEMPLATE;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static SWEEP_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(SWEEP_PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Progress bar over message-passing sweeps, silent in quiet mode
pub struct SweepProgress {
    bar: Option<ProgressBar>,
}

impl SweepProgress {
    /// Create a progress display for `iterations` sweeps
    pub fn new(iterations: usize, quiet: bool) -> Self {
        let bar = (!quiet).then(|| {
            let bar = ProgressBar::new(iterations as u64);
            bar.set_style(SWEEP_STYLE.clone());
            bar
        });
        Self { bar }
    }

    /// Record one completed sweep
    pub fn advance(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Finish and clear the display
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish();
        }
    }
}
