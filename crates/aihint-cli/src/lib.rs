//! # aihint-cli
//!
//! Command-line interface for the aihint trust scoring engine.
//!
//! ## Features
//!
//! - **Single scoring**: `aihint score <url>` runs all nine checks
//! - **Batch mode**: `aihint batch` scores many URLs, tolerating failures
//! - **Multiple output formats**: colored text, JSON, tables
//! - **TOML configuration**: weights, timeouts, API keys, per-check toggles

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
