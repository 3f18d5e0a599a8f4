//! Console summary formatting

use anyhow::Result;
use bitext_core::{Catalog, RunReport};

/// Trait for console formatters
pub trait OutputFormatter {
    /// Summarize a finished run, listing at most `show_misses` misses
    fn write_report(&mut self, report: &RunReport, show_misses: usize) -> Result<()>;

    /// List cataloged files
    fn write_catalog(&mut self, catalog: &Catalog) -> Result<()>;
}

/// Supported console formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

impl OutputFormat {
    /// Formatter writing to stdout
    pub fn stdout_formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new(std::io::stdout())),
            OutputFormat::Json => Box::new(JsonFormatter::new(std::io::stdout())),
        }
    }
}

/// Total number of misses across reasons
pub(crate) fn total_misses(report: &RunReport) -> usize {
    report.manifest.reasons_for_miss.values().sum()
}

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;
