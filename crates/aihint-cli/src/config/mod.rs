//! Configuration management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use aihint_core::ScoringConfig;

use crate::output::OutputFormat;

/// CLI configuration, loaded from a TOML file.
///
/// The `[scoring]` table maps directly onto the engine's config; any
/// omitted field keeps its engine default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine configuration (weights, timeouts, credentials, toggles).
    pub scoring: ScoringConfig,

    /// Default output format when --format is not given.
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("io", "aihint", "aihint")
            .context("could not determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load from the default path. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path. A missing file here is an error: the
    /// user asked for it.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }
}
