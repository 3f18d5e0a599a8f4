//! Align command implementation

use anyhow::Result;
use bitext_core::run_with_progress;
use clap::Args;
use std::path::PathBuf;

use super::{ProjectArgs, ScanArgs};
use crate::config::apply_languages;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::progress::ProgressReporter;

/// Misses listed in the console summary by default
pub const DEFAULT_SHOW_MISSES: usize = 20;

/// Arguments for the align command
#[derive(Debug, Args)]
pub struct AlignArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Translation map (default: <root>/translation-map.json when present)
    #[arg(long, value_name = "FILE")]
    pub map: Option<PathBuf>,

    /// Output directory (default: <root>/.bitext)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Source language code
    #[arg(long, value_name = "CODE")]
    pub source_lang: Option<String>,

    /// Target language code
    #[arg(long, value_name = "CODE")]
    pub target_lang: Option<String>,

    /// Number of worker threads (default: all cores)
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Number of misses listed in the summary
    #[arg(long, value_name = "N")]
    pub show_misses: Option<usize>,

    /// Console summary format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl AlignArgs {
    /// Execute the align command
    pub fn execute(&self, quiet: bool) -> Result<()> {
        log::info!("aligning project at {}", self.project.root.display());
        log::debug!("Arguments: {:?}", self);

        let file = self.project.load()?;
        let mut builder = self.scan.builder(&self.project, &file)?;

        if let Some(map) = &self.map {
            if !map.is_file() {
                return Err(CliError::FileNotFound(map.display().to_string()).into());
            }
            builder = builder.map_path(Some(map.clone()));
        }
        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir.clone());
        }
        builder = apply_languages(
            builder,
            self.source_lang.as_deref(),
            self.target_lang.as_deref(),
        )?;
        if let Some(threads) = self.threads {
            builder = builder.threads(Some(threads));
        }

        let config = builder.build().map_err(CliError::from)?;
        match config.threads() {
            Some(n) => log::info!("using {n} worker threads"),
            None => log::info!("using {} worker threads", num_cpus::get()),
        }

        let progress = ProgressReporter::new(quiet || self.format == OutputFormat::Json);
        let report = run_with_progress(&config, &progress).map_err(CliError::from)?;

        let show_misses = self
            .show_misses
            .or(file.output.show_misses)
            .unwrap_or(DEFAULT_SHOW_MISSES);
        self.format
            .stdout_formatter()
            .write_report(&report, show_misses)
    }
}
