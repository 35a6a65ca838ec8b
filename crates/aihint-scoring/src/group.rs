//! Category-level aggregation: run one fixed scorer set, combine outcomes.

use std::sync::Arc;
use std::time::Duration;

use aihint_core::MetricResult;
use tracing::{debug, warn};

use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};

/// Neutral score reported for scorers that were disabled by configuration.
const DISABLED_NEUTRAL_SCORE: f64 = 0.5;

/// One member of a group: a scorer with its fixed category-internal weight.
pub struct WeightedScorer {
    scorer: Arc<dyn Scorer>,
    weight: f64,
    enabled: bool,
}

impl WeightedScorer {
    /// Wrap a scorer with its fixed weight.
    pub fn new(scorer: impl Scorer + 'static, weight: f64) -> Self {
        Self {
            scorer: Arc::new(scorer),
            weight,
            enabled: true,
        }
    }

    /// Mark the member enabled or disabled. Disabled members are not run
    /// and contribute a skipped metric at a neutral score.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Combined outcome of one category, same shape the engine consumes.
#[derive(Debug, Clone, Default)]
pub struct GroupOutcome {
    /// Weighted category score in `[0, 1]`
    pub score: f64,
    /// Child metrics in declaration order
    pub metrics: Vec<MetricResult>,
    /// Concatenated child warnings
    pub warnings: Vec<String>,
    /// Concatenated child errors
    pub errors: Vec<String>,
}

/// Runs one category's fixed scorer set concurrently and combines the
/// results via fixed internal weights.
///
/// The member list is ordered, never keyed: metric ordering in the final
/// result follows declaration order deterministically.
pub struct MetricsGroup {
    name: &'static str,
    members: Vec<WeightedScorer>,
}

impl MetricsGroup {
    /// Build a group from its ordered members.
    #[must_use]
    pub fn new(name: &'static str, members: Vec<WeightedScorer>) -> Self {
        Self { name, members }
    }

    /// Category name (`security`, `reputation`, `compliance`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Run every enabled member concurrently with no fail-fast, then
    /// combine: `score = clamp(sum(score_i * weight_i), 0, 1)`.
    ///
    /// Each member is bounded by `timeout`; an elapsed timer or a panicking
    /// scorer (contract violation, absorbed here as defense in depth)
    /// becomes an `Error` metric with score 0.
    pub async fn run(&self, target: &ScoreTarget, timeout: Duration) -> GroupOutcome {
        // Fire all members at once; join strictly after every child finished.
        let handles: Vec<_> = self
            .members
            .iter()
            .map(|member| {
                if !member.enabled {
                    return None;
                }
                let scorer = Arc::clone(&member.scorer);
                let target = target.clone();
                Some(tokio::spawn(async move {
                    tokio::time::timeout(timeout, scorer.score(&target)).await
                }))
            })
            .collect();

        let mut outcome = GroupOutcome::default();

        for (member, handle) in self.members.iter().zip(handles) {
            let name = member.scorer.name();
            let child = match handle {
                None => {
                    debug!(group = self.name, scorer = name, "scorer disabled, skipping");
                    ScorerOutcome::from_metric(MetricResult::skipped(
                        name,
                        DISABLED_NEUTRAL_SCORE,
                        format!("{name} disabled by configuration"),
                    ))
                }
                Some(handle) => match handle.await {
                    Ok(Ok(child)) => child,
                    Ok(Err(_elapsed)) => {
                        warn!(group = self.name, scorer = name, timeout_secs = timeout.as_secs(), "scorer timed out");
                        ScorerOutcome::from_metric(MetricResult::error(
                            name,
                            format!("{name} timed out after {}s", timeout.as_secs()),
                            timeout.as_millis().try_into().unwrap_or(u64::MAX),
                        ))
                        .with_error(format!("{name} timed out after {}s", timeout.as_secs()))
                    }
                    Err(join_err) => {
                        // Contract violation: scorers must not panic. Absorb it
                        // here so the category still reports a total result.
                        warn!(group = self.name, scorer = name, error = %join_err, "scorer task failed");
                        let reason = if join_err.is_panic() {
                            format!("{name} panicked during scoring")
                        } else {
                            format!("{name} task was cancelled")
                        };
                        ScorerOutcome::from_metric(MetricResult::error(name, reason.clone(), 0))
                            .with_error(reason)
                    }
                },
            };

            outcome.score += child.score * member.weight;
            outcome.metrics.extend(child.metrics);
            outcome.warnings.extend(child.warnings);
            outcome.errors.extend(child.errors);
        }

        outcome.score = outcome.score.clamp(0.0, 1.0);
        debug!(
            group = self.name,
            score = outcome.score,
            metrics = outcome.metrics.len(),
            "group complete"
        );
        outcome
    }
}
