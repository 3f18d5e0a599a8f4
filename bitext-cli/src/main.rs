//! bitext command-line entry point

use anyhow::Result;
use bitext_cli::commands::{Commands, ListCommands};
use bitext_cli::init_logging;
use clap::Parser;

/// Discover bilingual Arabic/English documents and build a parallel corpus
#[derive(Debug, Parser)]
#[command(name = "bitext", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress progress output and non-error logs
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Align(args) => args.execute(cli.quiet),
        Commands::Catalog(args) => args.execute(),
        Commands::Validate(args) => args.execute(),
        Commands::List { subcommand } => match subcommand {
            ListCommands::Languages(args) => args.execute_languages(),
            ListCommands::Presets(args) => args.execute_presets(),
        },
    }
}
