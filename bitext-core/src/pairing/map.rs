//! Translation map file
//!
//! ```json
//! {
//!   "pairs":   [{ "source": "ar/ch1.txt", "target": "en/ch1.txt" }],
//!   "folders": [{ "sourceDir": "books/ar", "targetDir": "books/en", "pattern": "**/*.md" }]
//! }
//! ```

use crate::error::{BitextError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_pattern() -> String {
    "**/*".to_string()
}

/// Explicit source/target file pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairEntry {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Folder rule: files under `source_dir` matching `pattern` pair with the
/// same relative path under `target_dir`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRule {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

/// Explicit pairing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationMap {
    #[serde(default)]
    pub pairs: Vec<PairEntry>,
    #[serde(default)]
    pub folders: Vec<FolderRule>,
}

impl TranslationMap {
    /// Parse map JSON
    pub fn from_json_str(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Load a map file; `Ok(None)` when the file does not exist
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let source = std::fs::read_to_string(path).map_err(|e| BitextError::io(path, e))?;
        Self::from_json_str(&source)
            .map(Some)
            .map_err(|source| BitextError::MapParse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Load a map for a run, degrading to an empty map on any failure
    ///
    /// The flag tells whether a map was actually used.
    pub fn load_or_empty(path: Option<&Path>) -> (Self, bool) {
        let Some(path) = path else {
            return (Self::default(), false);
        };

        match Self::from_file(path) {
            Ok(Some(map)) => {
                log::info!(
                    "translation map {}: {} pairs, {} folder rules",
                    path.display(),
                    map.pairs.len(),
                    map.folders.len()
                );
                (map, true)
            }
            Ok(None) => {
                log::debug!("no translation map at {}", path.display());
                (Self::default(), false)
            }
            Err(e) => {
                log::warn!("{e}; continuing without a translation map");
                (Self::default(), false)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.folders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_map() {
        let map = TranslationMap::from_json_str(
            r#"{
                "pairs": [{"source": "ar/ch1.txt", "target": "en/ch1.txt"}],
                "folders": [{"sourceDir": "books/ar", "targetDir": "books/en", "pattern": "*.md"}]
            }"#,
        )
        .unwrap();
        assert_eq!(map.pairs[0].target, PathBuf::from("en/ch1.txt"));
        assert_eq!(map.folders[0].pattern, "*.md");
    }

    #[test]
    fn test_missing_sections_default() {
        let map = TranslationMap::from_json_str(r#"{"folders": [{"sourceDir": "a", "targetDir": "b"}]}"#)
            .unwrap();
        assert!(map.pairs.is_empty());
        assert_eq!(map.folders[0].pattern, "**/*");
    }

    #[test]
    fn test_invalid_json_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("translation-map.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            TranslationMap::from_file(&path),
            Err(BitextError::MapParse { .. })
        ));
        let (map, used) = TranslationMap::load_or_empty(Some(&path));
        assert!(map.is_empty());
        assert!(!used);
    }

    #[test]
    fn test_absent_map() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("none.json");
        assert!(TranslationMap::from_file(&path).unwrap().is_none());
        assert!(!TranslationMap::load_or_empty(Some(&path)).1);
        assert!(!TranslationMap::load_or_empty(None).1);
    }
}
