//! Include-glob resolution using glob

use anyhow::{Context, Result};
use glob::glob;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Resolve include patterns to files
///
/// Relative patterns are anchored at `root`. A pattern that matches
/// nothing is logged and skipped.
pub fn resolve_patterns(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let anchored = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            root.join(pattern).to_string_lossy().into_owned()
        };

        let paths = glob(&anchored).map_err(|e| CliError::InvalidPattern(format!("{pattern}: {e}")))?;

        let before = files.len();
        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {}", pattern))?;

            if path.is_file() {
                files.push(path);
            }
        }

        if files.len() == before {
            log::warn!("include pattern '{pattern}' matched no files");
        }
    }

    // Remove duplicates and sort
    files.sort();
    files.dedup();

    Ok(files)
}
