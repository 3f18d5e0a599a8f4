//! CLI command implementations

use anyhow::Result;
use bitext_core::{RunConfig, RunConfigBuilder};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::ProjectConfig;
use crate::input::resolve_patterns;

pub mod align;
pub mod catalog;
pub mod list;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Discover, pair and align documents, writing the parallel corpus
    Align(align::AlignArgs),

    /// Walk and classify candidate files without aligning
    Catalog(catalog::CatalogArgs),

    /// Validate a locale rule file or a translation map
    Validate(validate::ValidateArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List registered segmentation locales
    Languages(list::ListArgs),

    /// List presets from the project configuration
    Presets(list::ListArgs),
}

/// Project location and configuration file
#[derive(Debug, Clone, Args)]
pub struct ProjectArgs {
    /// Project root directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Project configuration file (default: <root>/bitext.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl ProjectArgs {
    /// Load the project configuration
    pub fn load(&self) -> Result<ProjectConfig> {
        ProjectConfig::discover(&self.root, self.config.as_deref())
    }
}

/// File selection shared by commands that walk the project
#[derive(Debug, Clone, Default, Args)]
pub struct ScanArgs {
    /// Extra files to include, as globs relative to the root
    #[arg(short, long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Exclude globs matched against project-relative paths
    #[arg(short = 'x', long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Skip word-processor (.docx) files
    #[arg(long)]
    pub no_docx: bool,

    /// Named include/exclude set from the project configuration
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,
}

impl ScanArgs {
    /// Start a run configuration from the file, then the preset, then the flags
    pub fn builder(&self, project: &ProjectArgs, file: &ProjectConfig) -> Result<RunConfigBuilder> {
        let root = &project.root;
        let mut builder = file.apply(root, RunConfig::builder(root))?;

        let mut include = Vec::new();
        let mut exclude = Vec::new();
        if let Some(name) = &self.preset {
            let preset = file.preset(name)?;
            include.extend(preset.include.iter().cloned());
            exclude.extend(preset.exclude.iter().cloned());
        }
        include.extend(self.include.iter().cloned());
        exclude.extend(self.exclude.iter().cloned());

        if !include.is_empty() {
            let files = resolve_patterns(root, &include)?;
            log::debug!("{} files from include globs", files.len());
            builder = builder.extra_paths(files);
        }
        builder = builder.exclude(exclude);

        if self.no_docx {
            builder = builder.include_docx(false);
        }

        Ok(builder)
    }
}
