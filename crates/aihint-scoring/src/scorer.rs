//! The scorer contract: one check, one outcome, never an error.

use aihint_core::{MetricResult, ScoreError};
use async_trait::async_trait;
use url::Url;

/// Parsed scoring target handed to every scorer.
///
/// Carries the pieces scorers keep re-deriving from the raw URL so each
/// one doesn't have to parse it again.
#[derive(Debug, Clone)]
pub struct ScoreTarget {
    /// The validated URL
    pub url: Url,
    /// Hostname, lowercased
    pub host: String,
    /// URL scheme (`https`, `http`, ...)
    pub scheme: String,
}

impl ScoreTarget {
    /// Parse and validate a raw URL string.
    ///
    /// This is the engine's single fatal condition: everything downstream
    /// of a successful parse is absorbed as metric data.
    pub fn parse(raw: &str) -> Result<Self, ScoreError> {
        let url = Url::parse(raw).map_err(|e| ScoreError::InvalidUrl(format!("{raw}: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| ScoreError::InvalidUrl(format!("{raw}: missing host")))?
            .to_lowercase();
        let scheme = url.scheme().to_string();
        Ok(Self { url, host, scheme })
    }

    /// Origin string (`scheme://host[:port]`) used to join conventional paths.
    #[must_use]
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// True when the target uses HTTPS.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.scheme == "https"
    }
}

/// Everything a scorer reports back: its aggregate score, the metrics it
/// produced, and any diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ScorerOutcome {
    /// Aggregate score in `[0, 1]` (mean of the scorer's own sub-checks)
    pub score: f64,
    /// Metric results, typically one per scorer
    pub metrics: Vec<MetricResult>,
    /// Non-fatal observations
    pub warnings: Vec<String>,
    /// Failures converted to text
    pub errors: Vec<String>,
}

impl ScorerOutcome {
    /// Outcome wrapping a single metric; the scorer score follows the metric.
    #[must_use]
    pub fn from_metric(metric: MetricResult) -> Self {
        Self {
            score: metric.score,
            metrics: vec![metric],
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Attach an error string, keeping the outcome itself non-failing.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// Attach a warning string.
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// A single-purpose trust check.
///
/// Contract:
/// - `score` MUST NOT return an error or panic; network, parse, and
///   external-API failures are converted to an `Error` (or `Skipped`)
///   metric with score 0/neutral and the failure text in the outcome's
///   `errors`/`warnings`.
/// - The returned score is the (possibly weighted) mean of the scorer's
///   own sub-checks, clamped to `[0, 1]`.
/// - Implementations hold no shared mutable state and are safe to invoke
///   concurrently across URLs.
///
/// Timeouts and panics are additionally absorbed one level up, at the
/// [`MetricsGroup`](crate::MetricsGroup) join boundary.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Stable identifier, also used as the metric name.
    fn name(&self) -> &'static str;

    /// Run the check against a target.
    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome;
}
