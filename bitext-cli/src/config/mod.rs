//! Project configuration file (`bitext.toml`)

use anyhow::{Context, Result};
use bitext_core::{Language, RunConfigBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// File name looked up in the project root
pub const CONFIG_FILE: &str = "bitext.toml";

/// Project configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub pairing: PairingConfig,

    #[serde(default)]
    pub alignment: AlignmentConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Named include/exclude glob sets
    #[serde(default)]
    pub presets: BTreeMap<String, Preset>,
}

/// Discovery settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Scan roots relative to the project root
    pub roots: Option<Vec<PathBuf>>,

    pub max_depth: Option<usize>,

    pub include_docx: Option<bool>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Pairing settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PairingConfig {
    /// Translation map, relative to the project root
    pub map: Option<PathBuf>,

    pub auto_threshold: Option<f64>,

    pub source_lang: Option<String>,

    pub target_lang: Option<String>,
}

/// Aligner settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AlignmentConfig {
    pub min_ratio: Option<f64>,

    pub max_ratio: Option<f64>,

    pub min_segment_chars: Option<usize>,

    /// Worker threads (0 = all cores)
    pub threads: Option<usize>,
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output directory, relative to the project root
    pub dir: Option<PathBuf>,

    /// Misses listed in the console summary
    pub show_misses: Option<usize>,
}

/// Segmentation settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentationConfig {
    /// Extra locale rule files, relative to the project root
    #[serde(default)]
    pub locale_files: Vec<PathBuf>,
}

/// A named set of include and exclude globs
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ProjectConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load the explicit file, or `<root>/bitext.toml` when present
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(CliError::FileNotFound(path.display().to_string()).into());
                }
                Self::load(path)
            }
            None => {
                let default = root.join(CONFIG_FILE);
                if default.is_file() {
                    log::info!("using project config {}", default.display());
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Look up a preset by name
    pub fn preset(&self, name: &str) -> Result<&Preset> {
        self.presets.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.presets.keys().map(String::as_str).collect();
            CliError::ConfigError(format!(
                "unknown preset '{name}' (known: {})",
                if known.is_empty() {
                    "none".to_string()
                } else {
                    known.join(", ")
                }
            ))
            .into()
        })
    }

    /// Apply the file's settings to a run configuration builder
    ///
    /// Relative paths are resolved against `root`.
    pub fn apply(&self, root: &Path, mut builder: RunConfigBuilder) -> Result<RunConfigBuilder> {
        if let Some(roots) = &self.catalog.roots {
            builder = builder.roots(roots.iter().cloned());
        }
        if let Some(depth) = self.catalog.max_depth {
            builder = builder.max_depth(depth);
        }
        if let Some(docx) = self.catalog.include_docx {
            builder = builder.include_docx(docx);
        }
        builder = builder.exclude(self.catalog.exclude.iter().cloned());

        if let Some(map) = &self.pairing.map {
            builder = builder.map_path(Some(root.join(map)));
        }
        if let Some(threshold) = self.pairing.auto_threshold {
            builder = builder.auto_threshold(threshold);
        }
        builder = apply_languages(
            builder,
            self.pairing.source_lang.as_deref(),
            self.pairing.target_lang.as_deref(),
        )?;

        match (self.alignment.min_ratio, self.alignment.max_ratio) {
            (None, None) => {}
            (min, max) => {
                builder = builder.ratio_bounds(
                    min.unwrap_or(bitext_core::config::defaults::MIN_LENGTH_RATIO),
                    max.unwrap_or(bitext_core::config::defaults::MAX_LENGTH_RATIO),
                );
            }
        }
        if let Some(chars) = self.alignment.min_segment_chars {
            builder = builder.min_segment_chars(chars);
        }
        if let Some(threads) = self.alignment.threads {
            builder = builder.threads((threads > 0).then_some(threads));
        }

        if let Some(dir) = &self.output.dir {
            builder = builder.output_dir(root.join(dir));
        }
        for file in &self.segmentation.locale_files {
            builder = builder.locale_file(root.join(file));
        }

        Ok(builder)
    }
}

/// Parse a language code given on the command line or in the config file
pub fn parse_language(code: &str) -> Result<Language> {
    code.parse::<Language>()
        .map_err(|e| CliError::ConfigError(e).into())
}

/// Apply optional language codes to a builder
///
/// A side left unset keeps the value already resolved on the builder, or
/// the counterpart of the given side when the two would be equal.
pub fn apply_languages(
    builder: RunConfigBuilder,
    source: Option<&str>,
    target: Option<&str>,
) -> Result<RunConfigBuilder> {
    Ok(match (source, target) {
        (Some(source), Some(target)) => {
            builder.languages(parse_language(source)?, parse_language(target)?)
        }
        (Some(source), None) => builder.source_language(parse_language(source)?),
        (None, Some(target)) => builder.target_language(parse_language(target)?),
        (None, None) => builder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitext_core::RunConfig;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[catalog]
roots = ["manuscripts"]
max_depth = 3
include_docx = false
exclude = ["**/drafts/**"]

[pairing]
map = "maps/pairs.json"
auto_threshold = 0.75

[alignment]
min_ratio = 0.5
threads = 2

[output]
dir = "out"
show_misses = 5

[presets.books]
include = ["books/**/*.txt"]
exclude = ["books/archive/**"]
"#;

    #[test]
    fn test_parse_sample() {
        let config = ProjectConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.catalog.max_depth, Some(3));
        assert_eq!(config.output.show_misses, Some(5));
        assert_eq!(config.presets["books"].include, vec!["books/**/*.txt"]);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ProjectConfig::from_toml_str("").unwrap(), ProjectConfig::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(ProjectConfig::from_toml_str("[catalog]\nroot = 1\n").is_err());
    }

    #[test]
    fn test_apply_resolves_against_root() {
        let config = ProjectConfig::from_toml_str(SAMPLE).unwrap();
        let root = Path::new("/proj");
        let run = config
            .apply(root, RunConfig::builder(root))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(run.roots(), &[PathBuf::from("manuscripts")]);
        assert_eq!(run.max_depth(), 3);
        assert!(!run.include_docx());
        assert_eq!(run.map_path(), Some(Path::new("/proj/maps/pairs.json")));
        assert_eq!(run.auto_threshold(), 0.75);
        assert_eq!(run.align_options().min_ratio, 0.5);
        assert_eq!(run.threads(), Some(2));
        assert_eq!(run.output_dir(), Path::new("/proj/out"));
        assert_eq!(run.exclude(), &["**/drafts/**".to_string()]);
    }

    #[test]
    fn test_unknown_preset() {
        let config = ProjectConfig::from_toml_str(SAMPLE).unwrap();
        let err = config.preset("nope").unwrap_err();
        assert!(err.to_string().contains("unknown preset 'nope'"));
        assert!(err.to_string().contains("books"));
    }

    #[test]
    fn test_discover_missing_default_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = ProjectConfig::discover(dir.path(), None).unwrap();
        assert!(config.presets.is_empty());
    }

    #[test]
    fn test_discover_missing_explicit_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("other.toml");
        assert!(ProjectConfig::discover(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_single_config_language_picks_counterpart() {
        let config = ProjectConfig::from_toml_str("[pairing]\nsource_lang = \"en\"\n").unwrap();
        let run = config
            .apply(Path::new("/proj"), RunConfig::builder("/proj"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(run.source_language(), Language::En);
        assert_eq!(run.target_language(), Language::Ar);
    }

    #[test]
    fn test_command_line_side_keeps_config_side() {
        let config = ProjectConfig::from_toml_str(
            "[pairing]\nsource_lang = \"en\"\ntarget_lang = \"ar\"\n",
        )
        .unwrap();
        let builder = config
            .apply(Path::new("/proj"), RunConfig::builder("/proj"))
            .unwrap();
        let run = apply_languages(builder, None, Some("ar"))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(run.source_language(), Language::En);
        assert_eq!(run.target_language(), Language::Ar);
    }

    #[test]
    fn test_bad_language_code() {
        let config = ProjectConfig::from_toml_str("[pairing]\nsource_lang = \"fr\"\n").unwrap();
        assert!(config.apply(Path::new("."), RunConfig::builder(".")).is_err());
    }
}
