//! Error handling for the CLI application

use std::fmt;

/// User-facing failures raised by the CLI itself
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Invalid glob pattern
    InvalidPattern(String),
    /// Project configuration error
    ConfigError(String),
    /// Run failure reported by the core
    ProcessingError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::ProcessingError(msg) => write!(f, "Processing error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<bitext_core::BitextError> for CliError {
    fn from(err: bitext_core::BitextError) -> Self {
        match err {
            bitext_core::BitextError::Config(msg) => CliError::ConfigError(msg),
            other => CliError::ProcessingError(other.to_string()),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
