//! Error types for the alignment pipeline
//!
//! Only configuration and output failures surface as errors from a run.
//! Everything that goes wrong with a single input file is converted into a
//! [`MissRecord`](crate::corpus::MissRecord) by the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline error
#[derive(Debug, Error)]
pub enum BitextError {
    /// I/O failure on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that was being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Invalid run or locale configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Translation map exists but is not valid JSON
    #[error("translation map {path} is not valid JSON: {source}")]
    MapParse {
        /// Map file path
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_json::Error,
    },

    /// No locale rules registered for the requested language
    #[error("locale '{code}' not supported")]
    UnsupportedLocale {
        /// The language code that was requested
        code: String,
    },

    /// A document could not be parsed by its declared kind
    #[error("malformed {kind} document {path}: {reason}")]
    MalformedDocument {
        /// Declared kind (docx, json, jsonl, text)
        kind: &'static str,
        /// Offending file
        path: PathBuf,
        /// Human readable reason
        reason: String,
    },

    /// Output artifacts could not be written
    #[error("failed to write output {path}: {source}")]
    Output {
        /// Output path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl BitextError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BitextError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a malformed-document error
    pub fn malformed(kind: &'static str, path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        BitextError::MalformedDocument {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, BitextError>;
