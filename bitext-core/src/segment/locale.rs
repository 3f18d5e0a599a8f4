//! Locale rule files and the registry that owns them
//!
//! A locale is described by a TOML file. English and Arabic ship embedded;
//! more can be registered at runtime. The registry is an ordinary value owned
//! by whoever builds the pipeline, so tests get isolated state.

use super::rules::RuleSegmenter;
use crate::error::{BitextError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

const EMBEDDED: &[(&str, &str)] = &[
    ("en", include_str!("../../configs/languages/english.toml")),
    ("ar", include_str!("../../configs/languages/arabic.toml")),
];

/// Root locale configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub metadata: Metadata,
    pub terminators: Terminators,
    #[serde(default)]
    pub ellipsis: Ellipsis,
    #[serde(default)]
    pub enclosures: Enclosures,
    #[serde(default)]
    pub abbreviations: Abbreviations,
}

/// Locale metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
}

/// Terminator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminators {
    pub chars: Vec<char>,
}

/// Ellipsis configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ellipsis {
    #[serde(default)]
    pub treat_as_boundary: bool,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Enclosure configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Enclosures {
    #[serde(default)]
    pub pairs: Vec<EnclosurePair>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnclosurePair {
    pub open: char,
    pub close: char,
}

/// Abbreviation configuration, grouped in free-form categories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Abbreviations {
    #[serde(flatten)]
    pub categories: BTreeMap<String, Vec<String>>,
}

impl LocaleConfig {
    /// Parse and validate a TOML locale description
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: LocaleConfig = toml::from_str(source)
            .map_err(|e| BitextError::Config(format!("invalid locale file: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a locale description from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| BitextError::io(path, e))?;
        Self::from_toml_str(&source).map_err(|e| match e {
            BitextError::Config(msg) => {
                BitextError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.metadata.code.trim().is_empty() {
            return Err(BitextError::Config(
                "locale code must not be empty".to_string(),
            ));
        }

        if self.terminators.chars.is_empty() {
            return Err(BitextError::Config(format!(
                "locale '{}' defines no terminator characters",
                self.metadata.code
            )));
        }

        Ok(())
    }
}

/// Registered locale rule sets, keyed by lowercase code
#[derive(Debug, Clone, Default)]
pub struct LocaleRegistry {
    rules: HashMap<String, Arc<RuleSegmenter>>,
}

impl LocaleRegistry {
    /// Registry without any locale
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the embedded English and Arabic rules
    pub fn embedded() -> Result<Self> {
        let mut registry = Self::empty();
        for (code, source) in EMBEDDED {
            let config = LocaleConfig::from_toml_str(source).map_err(|e| {
                BitextError::Config(format!("embedded locale '{code}' is broken: {e}"))
            })?;
            if config.metadata.code != *code {
                return Err(BitextError::Config(format!(
                    "embedded locale code mismatch: expected {code}, got {}",
                    config.metadata.code
                )));
            }
            registry.register(config);
        }
        Ok(registry)
    }

    /// Register (or replace) a locale
    pub fn register(&mut self, config: LocaleConfig) -> String {
        let code = config.metadata.code.to_lowercase();
        let rules = RuleSegmenter::from_config(&config);
        log::debug!("registered locale rules for '{code}'");
        self.rules.insert(code.clone(), Arc::new(rules));
        code
    }

    /// Load and register a locale file, returning its code
    pub fn register_file(&mut self, path: &Path) -> Result<String> {
        let config = LocaleConfig::from_file(path)?;
        Ok(self.register(config))
    }

    /// Rules for a locale code
    pub fn get(&self, code: &str) -> Result<Arc<RuleSegmenter>> {
        self.rules
            .get(&code.to_lowercase())
            .cloned()
            .ok_or_else(|| BitextError::UnsupportedLocale {
                code: code.to_string(),
            })
    }

    /// Sorted list of registered codes
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_registry_has_both_locales() {
        let registry = LocaleRegistry::embedded().unwrap();
        assert_eq!(registry.codes(), vec!["ar", "en"]);
        assert!(registry.get("EN").is_ok());
    }

    #[test]
    fn test_unknown_locale() {
        let registry = LocaleRegistry::embedded().unwrap();
        match registry.get("mixed") {
            Err(BitextError::UnsupportedLocale { code }) => assert_eq!(code, "mixed"),
            other => panic!("expected UnsupportedLocale, got {other:?}"),
        }
    }

    #[test]
    fn test_registries_are_independent() {
        let mut a = LocaleRegistry::empty();
        let b = LocaleRegistry::empty();
        a.register(
            LocaleConfig::from_toml_str(
                r#"
[metadata]
code = "xx"
name = "Test"

[terminators]
chars = ["|"]
"#,
            )
            .unwrap(),
        );
        assert!(a.get("xx").is_ok());
        assert!(b.get("xx").is_err());
    }

    #[test]
    fn test_rejects_missing_terminators() {
        let result = LocaleConfig::from_toml_str(
            r#"
[metadata]
code = "xx"
name = "Test"

[terminators]
chars = []
"#,
        );
        assert!(matches!(result, Err(BitextError::Config(_))));
    }

    #[test]
    fn test_rejects_empty_code() {
        let result = LocaleConfig::from_toml_str(
            r#"
[metadata]
code = " "
name = "Test"

[terminators]
chars = ["."]
"#,
        );
        assert!(result.is_err());
    }
}
