//! Command implementations.

pub mod batch;
pub mod score;

use aihint_core::ScoringConfig;
use aihint_scoring::TrustScoringEngine;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Engine configuration
    pub config: ScoringConfig,

    /// Output format
    pub format: OutputFormat,

    /// Show per-metric breakdown
    pub verbose: bool,
}

impl Context {
    /// Build the scoring engine from the configured settings.
    pub fn engine(&self) -> anyhow::Result<TrustScoringEngine> {
        Ok(TrustScoringEngine::new(self.config.clone())?)
    }
}
