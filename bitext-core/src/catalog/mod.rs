//! File discovery and classification

pub mod keys;
pub mod probe;

use crate::config::{defaults, RunConfig};
use crate::error::{BitextError, Result};
use crate::language::Language;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

/// Document format, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    Text,
    DocxLike,
    Json,
    Jsonl,
}

impl FormatKind {
    /// Format for a lowercase extension, None when unsupported
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "txt" | "text" | "md" | "markdown" => Some(FormatKind::Text),
            "docx" => Some(FormatKind::DocxLike),
            "json" => Some(FormatKind::Json),
            "jsonl" | "ndjson" => Some(FormatKind::Jsonl),
            _ => None,
        }
    }

    /// JSON and JSONL files
    pub fn is_structured(&self) -> bool {
        matches!(self, FormatKind::Json | FormatKind::Jsonl)
    }

    /// Short name used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatKind::Text => "text",
            FormatKind::DocxLike => "docx",
            FormatKind::Json => "json",
            FormatKind::Jsonl => "jsonl",
        }
    }
}

/// One cataloged file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Project-relative path with `/` separators (absolute for outside files)
    pub path: String,
    pub abs_path: PathBuf,
    pub extension: String,
    pub language: Language,
    /// Normalized basename key
    pub key: String,
    pub numeric_key: Option<String>,
    pub dir_signature: String,
    pub size: u64,
    pub has_markers: bool,
    pub format: FormatKind,
}

impl FileRecord {
    /// Bilingual on its own: inline markers or structured records
    pub fn is_single_file(&self) -> bool {
        self.has_markers || self.format.is_structured()
    }

    /// Parent directory part of the relative path
    pub fn parent(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }
}

/// All files of a run, keyed by relative path
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: BTreeMap<String, Arc<FileRecord>>,
}

impl Catalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, replacing an earlier one with the same path
    pub fn insert(&mut self, record: FileRecord) -> Arc<FileRecord> {
        let record = Arc::new(record);
        self.records.insert(record.path.clone(), Arc::clone(&record));
        record
    }

    /// Look up a record by relative path
    pub fn get(&self, path: &str) -> Option<&Arc<FileRecord>> {
        self.records.get(path)
    }

    /// Records in path order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<FileRecord>> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records per language
    pub fn language_counts(&self) -> BTreeMap<Language, usize> {
        let mut counts = BTreeMap::new();
        for record in self.records.values() {
            *counts.entry(record.language).or_insert(0) += 1;
        }
        counts
    }
}

/// Walks the configured roots and builds [`FileRecord`]s
#[derive(Debug)]
pub struct Cataloger<'a> {
    config: &'a RunConfig,
    excludes: Vec<glob::Pattern>,
}

impl<'a> Cataloger<'a> {
    /// Create a cataloger, compiling the exclude globs
    pub fn new(config: &'a RunConfig) -> Result<Self> {
        let excludes = config
            .exclude()
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|e| {
                    BitextError::Config(format!("invalid exclude pattern '{pattern}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { config, excludes })
    }

    /// Walk every root and the extra paths
    pub fn scan(&self) -> Catalog {
        let mut catalog = Catalog::new();

        for root in self.config.roots() {
            let dir = self.config.resolve(root);
            if !dir.is_dir() {
                log::debug!("scan root {} does not exist", dir.display());
                continue;
            }

            let walker = WalkDir::new(&dir)
                .max_depth(self.config.max_depth())
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| !self.is_skipped_dir(entry));

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("skipping unreadable entry: {e}");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Some(record) = self.record(entry.path()) {
                    catalog.insert(record);
                }
            }
        }

        for extra in self.config.extra_paths() {
            let path = self.config.resolve(extra);
            if !path.is_file() {
                log::warn!("included path {} is not a file", path.display());
                continue;
            }
            if let Some(record) = self.record(&path) {
                catalog.insert(record);
            }
        }

        log::info!("cataloged {} files", catalog.len());
        catalog
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() || entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        defaults::SKIP_DIRS.contains(&name.as_ref()) || entry.path() == self.config.output_dir()
    }

    fn is_excluded(&self, rel_path: &str) -> bool {
        self.excludes.iter().any(|p| p.matches(rel_path))
    }

    /// Path relative to the project root with `/` separators
    pub fn relative_path(&self, path: &Path) -> String {
        let rel = path.strip_prefix(self.config.project_root()).unwrap_or(path);
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::RootDir => Some(String::new()),
                _ => None,
            })
            .collect();
        parts.join("/")
    }

    /// Build the record for one file, None when it should be skipped
    pub fn record(&self, path: &Path) -> Option<FileRecord> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let format = FormatKind::from_extension(&extension)?;

        if format == FormatKind::DocxLike && !self.config.include_docx() {
            log::trace!("word-processor files disabled, skipping {}", path.display());
            return None;
        }

        let rel = self.relative_path(path);
        if self.is_excluded(&rel) {
            log::trace!("excluded {rel}");
            return None;
        }

        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::warn!("cannot stat {}: {e}", path.display());
                return None;
            }
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let rel_without_ext = match rel.rsplit_once('.') {
            Some((head, _)) if !extension.is_empty() => head.to_string(),
            _ => rel.clone(),
        };

        let key = keys::normalized_key(&stem);
        let numeric_key = keys::numeric_key(&key);
        let dir_signature = keys::dir_signature(&rel_without_ext);

        let probe = probe::probe_file(path, format);
        let language = if format.is_structured() {
            Language::Mixed
        } else {
            keys::path_language(&rel_without_ext).unwrap_or(probe.language)
        };

        Some(FileRecord {
            path: rel,
            abs_path: absolute(path),
            extension,
            language,
            key,
            numeric_key,
            dir_signature,
            size,
            has_markers: probe.has_markers,
            format,
        })
    }

    /// Record for a path given on the command line or in a map
    ///
    /// Files already in the catalog are reused; others are cataloged on the
    /// spot so explicit pairs may point outside the scan roots.
    pub fn resolve(&self, catalog: &mut Catalog, path: &Path) -> Option<Arc<FileRecord>> {
        let abs = self.config.resolve(path);
        let rel = self.relative_path(&abs);
        if let Some(record) = catalog.get(&rel) {
            return Some(Arc::clone(record));
        }
        if !abs.is_file() {
            return None;
        }
        self.record(&abs).map(|record| catalog.insert(record))
    }

    /// Run configuration
    pub fn config(&self) -> &RunConfig {
        self.config
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
