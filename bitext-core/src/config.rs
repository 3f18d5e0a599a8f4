//! Run configuration

use crate::error::{BitextError, Result};
use crate::language::Language;
use std::path::{Path, PathBuf};

/// Default configuration constants
pub mod defaults {
    /// Directories scanned under the project root
    pub const ROOTS: &[&str] = &["manuscripts", "books", "content", "translations", "docs"];

    /// Maximum directory depth below each root
    pub const MAX_DEPTH: usize = 6;

    /// Directories never descended into
    pub const SKIP_DIRS: &[&str] = &[
        ".git",
        ".hg",
        ".svn",
        "node_modules",
        "target",
        "vendor",
        ".venv",
        "__pycache__",
        "dist",
        "build",
    ];

    /// Translation map looked up in the project root
    pub const MAP_FILE: &str = "translation-map.json";

    /// Output directory under the project root
    pub const OUTPUT_DIR: &str = ".bitext";

    /// Minimum confidence for an automatic pair
    pub const AUTO_MATCH_THRESHOLD: f64 = 0.6;

    /// Lower ratio bound for an `aligned` entry
    pub const MIN_LENGTH_RATIO: f64 = 0.3;

    /// Upper ratio bound for an `aligned` entry
    pub const MAX_LENGTH_RATIO: f64 = 3.0;

    /// Segments shorter than this many characters are dropped
    pub const MIN_SEGMENT_CHARS: usize = 2;

    /// Bytes of content sampled when probing a text file
    pub const PROBE_BYTES: usize = 64 * 1024;

    /// Misses listed in the manifest
    pub const MANIFEST_MISS_CAP: usize = 200;
}

/// Pipeline configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub(crate) project_root: PathBuf,
    pub(crate) roots: Vec<PathBuf>,
    pub(crate) max_depth: usize,
    pub(crate) extra_paths: Vec<PathBuf>,
    pub(crate) exclude: Vec<String>,
    pub(crate) include_docx: bool,
    pub(crate) map_path: Option<PathBuf>,
    pub(crate) source_language: Language,
    pub(crate) target_language: Language,
    pub(crate) auto_threshold: f64,
    pub(crate) min_ratio: f64,
    pub(crate) max_ratio: f64,
    pub(crate) min_segment_chars: usize,
    pub(crate) threads: Option<usize>,
    pub(crate) output_dir: PathBuf,
    pub(crate) locale_files: Vec<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::for_root(".")
    }
}

impl RunConfig {
    /// Default configuration for a project root
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let project_root = root.into();
        Self {
            roots: defaults::ROOTS.iter().map(PathBuf::from).collect(),
            max_depth: defaults::MAX_DEPTH,
            extra_paths: Vec::new(),
            exclude: Vec::new(),
            include_docx: true,
            map_path: Some(project_root.join(defaults::MAP_FILE)),
            source_language: Language::Ar,
            target_language: Language::En,
            auto_threshold: defaults::AUTO_MATCH_THRESHOLD,
            min_ratio: defaults::MIN_LENGTH_RATIO,
            max_ratio: defaults::MAX_LENGTH_RATIO,
            min_segment_chars: defaults::MIN_SEGMENT_CHARS,
            threads: None,
            output_dir: project_root.join(defaults::OUTPUT_DIR),
            locale_files: Vec::new(),
            project_root,
        }
    }

    /// Create a configuration builder
    pub fn builder(root: impl Into<PathBuf>) -> RunConfigBuilder {
        RunConfigBuilder::new(root)
    }

    /// Project root all relative paths are resolved against
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Scan roots, relative to the project root
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Maximum walk depth below each root
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Explicitly included files
    pub fn extra_paths(&self) -> &[PathBuf] {
        &self.extra_paths
    }

    /// Exclude globs, matched against project-relative paths
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Are word-processor files eligible?
    pub fn include_docx(&self) -> bool {
        self.include_docx
    }

    /// Translation map location
    pub fn map_path(&self) -> Option<&Path> {
        self.map_path.as_deref()
    }

    /// Language of source documents
    pub fn source_language(&self) -> Language {
        self.source_language
    }

    /// Language of target documents
    pub fn target_language(&self) -> Language {
        self.target_language
    }

    /// Minimum automatic match confidence
    pub fn auto_threshold(&self) -> f64 {
        self.auto_threshold
    }

    /// Minimum segment length in characters
    pub fn min_segment_chars(&self) -> usize {
        self.min_segment_chars
    }

    /// Worker threads (None = all cores)
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Output directory for the segment stream and manifest
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Additional locale rule files
    pub fn locale_files(&self) -> &[PathBuf] {
        &self.locale_files
    }

    /// Ratio bounds for the aligner
    pub fn align_options(&self) -> crate::align::AlignOptions {
        crate::align::AlignOptions {
            min_ratio: self.min_ratio,
            max_ratio: self.max_ratio,
        }
    }

    /// Resolve a possibly relative path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.auto_threshold) {
            return Err(BitextError::Config(format!(
                "auto-match threshold must be within [0, 1], got {}",
                self.auto_threshold
            )));
        }

        if self.min_ratio <= 0.0 || self.min_ratio >= self.max_ratio {
            return Err(BitextError::Config(format!(
                "length ratio bounds must satisfy 0 < min < max, got {} / {}",
                self.min_ratio, self.max_ratio
            )));
        }

        if !self.source_language.is_concrete()
            || !self.target_language.is_concrete()
            || self.source_language == self.target_language
        {
            return Err(BitextError::Config(format!(
                "source and target must be two different concrete languages, got {} / {}",
                self.source_language, self.target_language
            )));
        }

        if self.threads == Some(0) {
            return Err(BitextError::Config(
                "threads must be greater than 0".into(),
            ));
        }

        if self.max_depth == 0 {
            return Err(BitextError::Config(
                "max_depth must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

/// Fluent builder for [`RunConfig`]
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Start from defaults for a project root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: RunConfig::for_root(root),
        }
    }

    /// Replace the scan roots
    pub fn roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config.roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Set the maximum walk depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Add explicitly included files
    pub fn extra_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.config.extra_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add exclude globs
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Allow or forbid word-processor files
    pub fn include_docx(mut self, enabled: bool) -> Self {
        self.config.include_docx = enabled;
        self
    }

    /// Set the translation map path (None disables the map)
    pub fn map_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.map_path = path;
        self
    }

    /// Set source and target languages
    pub fn languages(mut self, source: Language, target: Language) -> Self {
        self.config.source_language = source;
        self.config.target_language = target;
        self
    }

    /// Set the source language only
    ///
    /// A target equal to the new source flips to its counterpart.
    pub fn source_language(mut self, source: Language) -> Self {
        self.config.source_language = source;
        if self.config.target_language == source {
            if let Some(other) = source.counterpart() {
                self.config.target_language = other;
            }
        }
        self
    }

    /// Set the target language only
    ///
    /// A source equal to the new target flips to its counterpart.
    pub fn target_language(mut self, target: Language) -> Self {
        self.config.target_language = target;
        if self.config.source_language == target {
            if let Some(other) = target.counterpart() {
                self.config.source_language = other;
            }
        }
        self
    }

    /// Set the automatic match threshold
    pub fn auto_threshold(mut self, threshold: f64) -> Self {
        self.config.auto_threshold = threshold;
        self
    }

    /// Set the aligner ratio bounds
    pub fn ratio_bounds(mut self, min: f64, max: f64) -> Self {
        self.config.min_ratio = min;
        self.config.max_ratio = max;
        self
    }

    /// Set the minimum segment length
    pub fn min_segment_chars(mut self, chars: usize) -> Self {
        self.config.min_segment_chars = chars;
        self
    }

    /// Set the number of threads (None = all available)
    pub fn threads(mut self, count: Option<usize>) -> Self {
        self.config.threads = count;
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Register an extra locale rule file
    pub fn locale_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.locale_files.push(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RunConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::for_root("/proj");
        assert_eq!(config.roots().len(), defaults::ROOTS.len());
        assert_eq!(config.source_language(), Language::Ar);
        assert_eq!(config.target_language(), Language::En);
        assert_eq!(config.output_dir(), Path::new("/proj/.bitext"));
        assert_eq!(
            config.map_path(),
            Some(Path::new("/proj/translation-map.json"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_rejects_bad_threshold() {
        let result = RunConfig::builder(".").auto_threshold(1.5).build();
        assert!(matches!(result, Err(BitextError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_inverted_ratio_bounds() {
        assert!(RunConfig::builder(".").ratio_bounds(3.0, 0.3).build().is_err());
        assert!(RunConfig::builder(".").ratio_bounds(0.0, 3.0).build().is_err());
    }

    #[test]
    fn test_builder_rejects_same_languages() {
        let result = RunConfig::builder(".")
            .languages(Language::En, Language::En)
            .build();
        assert!(result.is_err());

        let result = RunConfig::builder(".")
            .languages(Language::Mixed, Language::En)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_single_language_keeps_or_flips_other_side() {
        let flipped = RunConfig::builder("/proj")
            .source_language(Language::En)
            .build()
            .unwrap();
        assert_eq!(flipped.source_language(), Language::En);
        assert_eq!(flipped.target_language(), Language::Ar);

        let kept = RunConfig::builder("/proj")
            .languages(Language::En, Language::Ar)
            .target_language(Language::Ar)
            .build()
            .unwrap();
        assert_eq!(kept.source_language(), Language::En);
        assert_eq!(kept.target_language(), Language::Ar);

        let target_only = RunConfig::builder("/proj")
            .target_language(Language::Ar)
            .build()
            .unwrap();
        assert_eq!(target_only.source_language(), Language::En);
    }

    #[test]
    fn test_builder_rejects_zero_threads() {
        assert!(RunConfig::builder(".").threads(Some(0)).build().is_err());
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let config = RunConfig::for_root("/proj");
        assert_eq!(config.resolve(Path::new("a/b.txt")), PathBuf::from("/proj/a/b.txt"));
        assert_eq!(config.resolve(Path::new("/abs/c.txt")), PathBuf::from("/abs/c.txt"));
    }

    #[test]
    fn test_builder_accumulates_lists() {
        let config = RunConfig::builder("/proj")
            .roots(["books"])
            .exclude(["**/drafts/**"])
            .exclude(["*.bak"])
            .extra_paths(["notes/a.txt"])
            .include_docx(false)
            .build()
            .unwrap();
        assert_eq!(config.roots(), &[PathBuf::from("books")]);
        assert_eq!(config.exclude().len(), 2);
        assert_eq!(config.extra_paths().len(), 1);
        assert!(!config.include_docx());
    }
}
