//! Discrete trust classification bands.

use serde::{Deserialize, Serialize};

/// Trust level classification derived from a final score.
///
/// The five bands partition `[0, 1]` with no gaps or overlap:
/// `[0, 0.3)`, `[0.3, 0.5)`, `[0.5, 0.7)`, `[0.7, 0.9)`, `[0.9, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustLevel {
    /// `[0, 0.3)` — malicious, compromised, or highly suspicious
    VeryLow,
    /// `[0.3, 0.5)` — multiple red flags, proceed with caution
    Low,
    /// `[0.5, 0.7)` — newer sites, some concerns
    Moderate,
    /// `[0.7, 0.9)` — legitimate businesses, established sites
    Good,
    /// `[0.9, 1.0]` — banks, major corporations, verified entities
    High,
}

impl TrustLevel {
    /// Classify a score. Total over any float: values below 0 band as
    /// `VeryLow`, values above 1 band as `High`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::High
        } else if score >= 0.7 {
            Self::Good
        } else if score >= 0.5 {
            Self::Moderate
        } else if score >= 0.3 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Human-readable description of the band.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::VeryLow => "Very low trust (malicious, compromised, or highly suspicious)",
            Self::Low => "Low trust (multiple red flags, proceed with caution)",
            Self::Moderate => "Moderate trust (newer sites, some concerns)",
            Self::Good => "Good trust (legitimate businesses, established sites)",
            Self::High => "Highly trusted (banks, major corporations, verified entities)",
        }
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::VeryLow => "VERY_LOW",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::Good => "GOOD",
            Self::High => "HIGH",
        };
        write!(f, "{name}")
    }
}
