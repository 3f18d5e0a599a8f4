//! Catalog command implementation

use anyhow::Result;
use bitext_core::Cataloger;
use clap::Args;

use super::{ProjectArgs, ScanArgs};
use crate::error::CliError;
use crate::output::OutputFormat;

/// Arguments for the catalog command
#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CatalogArgs {
    /// Execute the catalog command
    pub fn execute(&self) -> Result<()> {
        let file = self.project.load()?;
        let config = self
            .scan
            .builder(&self.project, &file)?
            .build()
            .map_err(CliError::from)?;

        let catalog = Cataloger::new(&config).map_err(CliError::from)?.scan();
        log::info!("cataloged {} files", catalog.len());

        self.format.stdout_formatter().write_catalog(&catalog)
    }
}
