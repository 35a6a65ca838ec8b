//! Command-line argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Website trust scoring from the command line
///
/// Runs security, reputation, and compliance checks against a site and
/// aggregates them into a single trust score. Scoring never fails: an
/// unreachable or suspicious site gets a low score, not an error.
#[derive(Parser, Debug)]
#[command(name = "aihint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Per-check timeout in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Show per-metric breakdown, warnings, and errors
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a single website
    Score(ScoreArgs),

    /// Score multiple websites, continuing past individual failures
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// URL to score (e.g. https://example.com)
    pub url: String,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// URLs to score
    pub urls: Vec<String>,

    /// Read additional URLs from a file, one per line
    #[arg(long)]
    pub file: Option<PathBuf>,
}
