//! Progress reporting module

use bitext_core::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over alignment work units
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a reporter; a quiet reporter draws nothing
    pub fn new(quiet: bool) -> Self {
        let progress_bar = if quiet {
            None
        } else {
            Some(ProgressBar::hidden())
        };
        Self { progress_bar }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} units {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-")
    }
}

impl ProgressSink for ProgressReporter {
    fn start(&self, total: usize) {
        if let Some(pb) = &self.progress_bar {
            pb.set_length(total as u64);
            pb.set_style(Self::style());
            pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
            pb.enable_steady_tick(Duration::from_millis(100));
        }
    }

    fn advance(&self, unit: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(unit.to_string());
            pb.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("done");
        }
    }
}
