//! List command implementations

use anyhow::Result;
use bitext_core::LocaleRegistry;
use clap::Args;

use super::ProjectArgs;
use crate::error::CliError;

/// Arguments shared by the list subcommands
#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl ListArgs {
    /// List embedded locales plus those registered by the project configuration
    pub fn execute_languages(&self) -> Result<()> {
        let file = self.project.load()?;
        let mut registry = LocaleRegistry::embedded().map_err(CliError::from)?;
        for path in &file.segmentation.locale_files {
            registry
                .register_file(&self.project.root.join(path))
                .map_err(CliError::from)?;
        }

        println!("Available segmentation locales:");
        for code in registry.codes() {
            let rules = registry.get(code).map_err(CliError::from)?;
            println!(
                "  {:<6} {} ({} abbreviations)",
                code,
                rules.locale_name(),
                rules.abbreviation_count()
            );
        }
        Ok(())
    }

    /// List presets defined in the project configuration
    pub fn execute_presets(&self) -> Result<()> {
        let file = self.project.load()?;
        if file.presets.is_empty() {
            println!("No presets defined");
            return Ok(());
        }

        println!("Available presets:");
        for (name, preset) in &file.presets {
            println!(
                "  {name}: include [{}], exclude [{}]",
                preset.include.join(", "),
                preset.exclude.join(", ")
            );
        }
        Ok(())
    }
}
