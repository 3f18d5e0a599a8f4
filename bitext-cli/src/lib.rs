//! bitext CLI library
//!
//! Command-line surface for the bitext corpus builder: argument parsing,
//! project configuration, include-glob resolution, console summaries and
//! progress reporting on top of `bitext-core`.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};

/// Initialize logging from the verbosity flags
///
/// `RUST_LOG` still takes precedence over the derived default filter.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    // try_init: the logger may already be installed
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}
