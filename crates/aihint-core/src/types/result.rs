//! Final immutable output of one scoring run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MetricResult, TrustLevel};

/// Method tag identifying the scoring algorithm version.
pub const SCORING_METHOD: &str = "aihint-scoring-v1";

/// Result of one trust scoring invocation.
///
/// Created once per call and never mutated. `trust_level` is always
/// derived from `final_score` via [`TrustLevel::from_score`]; construct
/// through [`ScoringResult::assemble`] to keep that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResult {
    /// The URL that was scored, as given by the caller
    pub url: String,
    /// Weighted final score in `[0, 1]`
    pub final_score: f64,
    /// Classification band of `final_score`
    pub trust_level: TrustLevel,
    /// Human-readable description of the band
    pub trust_level_description: String,
    /// Fraction of checks that succeeded with a positive score
    pub confidence: f64,
    /// Security category score in `[0, 1]`
    pub security_score: f64,
    /// Reputation category score in `[0, 1]`
    pub reputation_score: f64,
    /// Compliance category score in `[0, 1]`
    pub compliance_score: f64,
    /// Per-check results in group-then-scorer execution order
    pub detailed_metrics: Vec<MetricResult>,
    /// Non-fatal observations collected along the way
    pub warnings: Vec<String>,
    /// Failures that degraded checks to zero/neutral
    pub errors: Vec<String>,
    /// When the scoring run completed
    pub timestamp: DateTime<Utc>,
    /// Scoring algorithm tag, always [`SCORING_METHOD`]
    pub method: String,
}

/// Inputs to [`ScoringResult::assemble`], bundled to keep the call site
/// readable.
#[derive(Debug, Clone, Default)]
pub struct ResultParts {
    /// Weighted final score (clamped during assembly)
    pub final_score: f64,
    /// Confidence fraction
    pub confidence: f64,
    /// Category scores (security, reputation, compliance)
    pub category_scores: (f64, f64, f64),
    /// All collected metrics in execution order
    pub metrics: Vec<MetricResult>,
    /// Collected warnings
    pub warnings: Vec<String>,
    /// Collected errors
    pub errors: Vec<String>,
}

impl ScoringResult {
    /// Assemble a result, deriving `trust_level` from the final score.
    #[must_use]
    pub fn assemble(url: impl Into<String>, parts: ResultParts) -> Self {
        let final_score = parts.final_score.clamp(0.0, 1.0);
        let trust_level = TrustLevel::from_score(final_score);
        let (security_score, reputation_score, compliance_score) = parts.category_scores;

        Self {
            url: url.into(),
            final_score,
            trust_level,
            trust_level_description: trust_level.description().to_string(),
            confidence: parts.confidence.clamp(0.0, 1.0),
            security_score,
            reputation_score,
            compliance_score,
            detailed_metrics: parts.metrics,
            warnings: parts.warnings,
            errors: parts.errors,
            timestamp: Utc::now(),
            method: SCORING_METHOD.to_string(),
        }
    }

    /// The floor result for an unparseable URL: score 0, zero confidence,
    /// a single error.
    #[must_use]
    pub fn rejected(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self::assemble(
            url,
            ResultParts {
                errors: vec![error.into()],
                ..ResultParts::default()
            },
        )
    }
}
