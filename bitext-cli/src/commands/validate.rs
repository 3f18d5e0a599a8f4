//! Validate command implementation

use anyhow::Result;
use bitext_core::segment::{LocaleConfig, RuleSegmenter};
use bitext_core::TranslationMap;
use clap::Args;
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Arguments for the validate command
#[derive(Debug, Args)]
#[command(group(clap::ArgGroup::new("target").required(true).multiple(true)))]
pub struct ValidateArgs {
    /// Locale rule file to validate
    #[arg(long, value_name = "FILE", group = "target")]
    pub locale_config: Option<PathBuf>,

    /// Translation map to validate
    #[arg(long, value_name = "FILE", group = "target")]
    pub map: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        if let Some(path) = &self.locale_config {
            validate_locale(path)?;
        }
        if let Some(path) = &self.map {
            validate_map(path)?;
        }
        Ok(())
    }
}

fn validate_locale(path: &Path) -> Result<()> {
    println!("Validating locale configuration: {}", path.display());

    match LocaleConfig::from_file(path) {
        Ok(config) => {
            let rules = RuleSegmenter::from_config(&config);
            println!("✓ Configuration is valid!");
            println!("  Locale code: {}", rules.code());
            println!("  Locale name: {}", rules.locale_name());
            println!("  Abbreviations: {}", rules.abbreviation_count());
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {e}");
            Err(anyhow::anyhow!("Validation failed: {}", e))
        }
    }
}

fn validate_map(path: &Path) -> Result<()> {
    println!("Validating translation map: {}", path.display());

    match TranslationMap::from_file(path) {
        Ok(Some(map)) => {
            println!("✓ Translation map is valid!");
            println!("  Pairs: {}", map.pairs.len());
            println!("  Folder rules: {}", map.folders.len());
            Ok(())
        }
        Ok(None) => Err(CliError::FileNotFound(path.display().to_string()).into()),
        Err(e) => {
            println!("✗ Translation map is invalid!");
            println!("  Error: {e}");
            Err(anyhow::anyhow!("Validation failed: {}", e))
        }
    }
}
