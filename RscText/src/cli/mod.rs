//! `RscText` CLI - command-line interface for game text archives

pub mod commands;

use clap::Parser;
use commands::Commands;
use commands::definitions::ResolverArgs;
use tracing::Level;

#[derive(Parser)]
#[command(name = "rsctext")]
#[command(about = "RscText: resolve, translate, and pack legacy game text", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    resolver: ResolverArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Run the `RscText` CLI
///
/// # Errors
/// Returns an error if the selected command fails.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.resolver.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute(&cli.resolver)
}
