//! Atomic outcome of a single check.

use serde::{Deserialize, Serialize};

/// Status of a metric check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    /// The check ran and produced a measurement
    Success,
    /// The check ran but observed something concerning
    Warning,
    /// The check failed (network, parse, external API)
    Error,
    /// The check was intentionally not run (disabled, missing credentials)
    Skipped,
}

/// Immutable record of one check's outcome.
///
/// Created once by a scorer at completion and never mutated afterwards.
/// `name` is unique within one scoring invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricResult {
    /// Check identifier, e.g. `"ssl_tls"`
    pub name: String,
    /// Measurement in `[0.0, 1.0]`
    pub score: f64,
    /// Outcome classification
    pub status: MetricStatus,
    /// Human-readable summary
    pub message: String,
    /// Opaque structured breakdown (sub-check details)
    pub details: serde_json::Value,
    /// Wall-clock execution time in milliseconds
    pub execution_time_ms: u64,
}

impl MetricResult {
    /// Build a metric with an explicit status, clamping the score to `[0, 1]`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: MetricStatus,
        score: f64,
        message: impl Into<String>,
        details: serde_json::Value,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            score: score.clamp(0.0, 1.0),
            status,
            message: message.into(),
            details,
            execution_time_ms,
        }
    }

    /// Successful measurement.
    #[must_use]
    pub fn success(
        name: impl Into<String>,
        score: f64,
        message: impl Into<String>,
        details: serde_json::Value,
        execution_time_ms: u64,
    ) -> Self {
        Self::new(name, MetricStatus::Success, score, message, details, execution_time_ms)
    }

    /// Measurement that succeeded but observed something concerning.
    #[must_use]
    pub fn warning(
        name: impl Into<String>,
        score: f64,
        message: impl Into<String>,
        details: serde_json::Value,
        execution_time_ms: u64,
    ) -> Self {
        Self::new(name, MetricStatus::Warning, score, message, details, execution_time_ms)
    }

    /// Failed check. Score is pinned to 0.
    #[must_use]
    pub fn error(
        name: impl Into<String>,
        message: impl Into<String>,
        execution_time_ms: u64,
    ) -> Self {
        Self::new(
            name,
            MetricStatus::Error,
            0.0,
            message,
            serde_json::Value::Object(serde_json::Map::new()),
            execution_time_ms,
        )
    }

    /// Intentionally-skipped check at a neutral score.
    #[must_use]
    pub fn skipped(name: impl Into<String>, score: f64, message: impl Into<String>) -> Self {
        Self::new(
            name,
            MetricStatus::Skipped,
            score,
            message,
            serde_json::Value::Object(serde_json::Map::new()),
            0,
        )
    }

    /// True when this metric counts toward confidence: the check ran
    /// successfully *and* yielded a positive score.
    #[must_use]
    pub fn is_confident(&self) -> bool {
        self.status == MetricStatus::Success && self.score > 0.0
    }
}
