//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration: explicit --config must exist, the default path
    // may be absent.
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(secs) = cli.timeout {
        config.scoring.scorer_timeout_secs = secs;
    }

    let format = cli
        .format
        .or(config.format)
        .unwrap_or(OutputFormat::Text);

    let ctx = commands::Context {
        config: config.scoring,
        format,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Score(args) => commands::score::execute(ctx, args).await,
        Commands::Batch(args) => commands::batch::execute(ctx, args).await,
    }
}
