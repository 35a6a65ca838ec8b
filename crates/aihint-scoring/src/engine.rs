//! The trust scoring engine: orchestrates the three metric categories.

use aihint_core::{Result, ResultParts, ScoringConfig, ScoringResult};
use tracing::{info, warn};

use crate::group::MetricsGroup;
use crate::scorer::ScoreTarget;
use crate::{compliance, reputation, security};

/// Orchestrates the Security, Reputation, and Compliance groups and
/// combines their scores into a final weighted score, a confidence value,
/// and a trust-level classification.
///
/// The engine holds no mutable state: the configuration is read-only for
/// the duration of a call and one engine may serve any number of
/// concurrent `score_website` calls.
pub struct TrustScoringEngine {
    config: ScoringConfig,
    security: MetricsGroup,
    reputation: MetricsGroup,
    compliance: MetricsGroup,
}

impl TrustScoringEngine {
    /// Build an engine with the standard nine scorers.
    ///
    /// Only construction of the shared clients can fail; scoring itself
    /// never does.
    pub fn new(config: ScoringConfig) -> Result<Self> {
        let security = security::group(&config)?;
        let reputation = reputation::group(&config)?;
        let compliance = compliance::group(&config)?;
        Ok(Self::with_groups(config, security, reputation, compliance))
    }

    /// Build an engine from pre-built groups. This is the seam the tests
    /// use to inject mock scorers.
    #[must_use]
    pub fn with_groups(
        config: ScoringConfig,
        security: MetricsGroup,
        reputation: MetricsGroup,
        compliance: MetricsGroup,
    ) -> Self {
        let sum = config.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            warn!(sum, "category weights do not sum to 1.0; final score will be clamped");
        }
        Self {
            config,
            security,
            reputation,
            compliance,
        }
    }

    /// Score a website's trustworthiness.
    ///
    /// Total over any input string: an unparseable URL yields the floor
    /// result (score 0, `VERY_LOW`, confidence 0, one error) — the single
    /// engine-level early exit. Every other failure mode is absorbed by
    /// the groups and surfaces only as metric data.
    pub async fn score_website(&self, url: &str) -> ScoringResult {
        info!(url, "starting trust scoring");

        let target = match ScoreTarget::parse(url) {
            Ok(target) => target,
            Err(e) => {
                warn!(url, error = %e, "rejecting unparseable URL");
                return ScoringResult::rejected(url, e.to_string());
            }
        };

        let timeout = self.config.scorer_timeout();

        // Fire all three categories at once; each group is total, so there
        // is no short-circuit to take. A group reporting 0 because every
        // child failed is a valid low-confidence result.
        let (sec, rep, comp) = tokio::join!(
            self.security.run(&target, timeout),
            self.reputation.run(&target, timeout),
            self.compliance.run(&target, timeout),
        );

        let weights = self.config.weights;
        let final_score = (sec.score * weights.security
            + rep.score * weights.reputation
            + comp.score * weights.compliance)
            .clamp(0.0, 1.0);

        let mut warnings = Vec::new();
        if sec.score < 0.5 {
            warnings.push("Low security score detected".to_string());
        }
        if rep.score < 0.5 {
            warnings.push("Low reputation score detected".to_string());
        }
        if comp.score < 0.5 {
            warnings.push("Low compliance score detected".to_string());
        }

        let mut metrics = sec.metrics;
        metrics.extend(rep.metrics);
        metrics.extend(comp.metrics);

        warnings.extend(sec.warnings);
        warnings.extend(rep.warnings);
        warnings.extend(comp.warnings);

        let mut errors = sec.errors;
        errors.extend(rep.errors);
        errors.extend(comp.errors);

        let confidence = confidence_of(&metrics);

        let result = ScoringResult::assemble(
            url,
            ResultParts {
                final_score,
                confidence,
                category_scores: (sec.score, rep.score, comp.score),
                metrics,
                warnings,
                errors,
            },
        );

        info!(
            url,
            final_score = result.final_score,
            trust_level = %result.trust_level,
            confidence = result.confidence,
            "scoring complete"
        );
        result
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

/// Fraction of metrics that both ran successfully and yielded a positive
/// score. A correctly measured zero still lowers confidence; that
/// conflation is deliberate and preserved.
#[allow(clippy::cast_precision_loss)]
fn confidence_of(metrics: &[aihint_core::MetricResult]) -> f64 {
    if metrics.is_empty() {
        return 0.0;
    }
    let successful = metrics.iter().filter(|m| m.is_confident()).count();
    successful as f64 / metrics.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::WeightedScorer;
    use crate::scorer::{Scorer, ScorerOutcome};
    use aihint_core::{CategoryWeights, MetricResult, MetricStatus, TrustLevel};
    use async_trait::async_trait;
    use serde_json::json;

    struct MockScorer {
        name: &'static str,
        score: f64,
        status: MetricStatus,
    }

    #[async_trait]
    impl Scorer for MockScorer {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn score(&self, _target: &ScoreTarget) -> ScorerOutcome {
            let metric =
                MetricResult::new(self.name, self.status, self.score, "mock", json!({}), 1);
            if self.status == MetricStatus::Error {
                ScorerOutcome::from_metric(metric).with_error(format!("{} failed", self.name))
            } else {
                ScorerOutcome::from_metric(metric)
            }
        }
    }

    struct ThrowingScorer;

    #[async_trait]
    impl Scorer for ThrowingScorer {
        fn name(&self) -> &'static str {
            "throwing"
        }

        async fn score(&self, _target: &ScoreTarget) -> ScorerOutcome {
            panic!("unexpected runtime error");
        }
    }

    /// Nine mocks at a uniform score/status, grouped 3-3-3 with the
    /// standard category-internal weights.
    fn uniform_engine(score: f64, status: MetricStatus) -> TrustScoringEngine {
        let group = |name: &'static str, prefix: &'static str| {
            let names: [&'static str; 3] = match prefix {
                "s" => ["s1", "s2", "s3"],
                "r" => ["r1", "r2", "r3"],
                _ => ["c1", "c2", "c3"],
            };
            MetricsGroup::new(
                name,
                vec![
                    WeightedScorer::new(MockScorer { name: names[0], score, status }, 0.40),
                    WeightedScorer::new(MockScorer { name: names[1], score, status }, 0.35),
                    WeightedScorer::new(MockScorer { name: names[2], score, status }, 0.25),
                ],
            )
        };
        TrustScoringEngine::with_groups(
            ScoringConfig::default(),
            group("security", "s"),
            group("reputation", "r"),
            group("compliance", "c"),
        )
    }

    #[tokio::test]
    async fn default_engine_constructs() {
        // Covers the whole construction path, TLS client config included.
        assert!(TrustScoringEngine::new(ScoringConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn all_success_scores_perfect() {
        let engine = uniform_engine(1.0, MetricStatus::Success);
        let result = engine.score_website("https://example.com").await;

        assert!((result.final_score - 1.0).abs() < 1e-12);
        assert_eq!(result.trust_level, TrustLevel::High);
        assert!((result.confidence - 1.0).abs() < 1e-12);
        assert_eq!(result.detailed_metrics.len(), 9);
    }

    #[tokio::test]
    async fn all_error_scores_floor() {
        let engine = uniform_engine(0.0, MetricStatus::Error);
        let result = engine.score_website("https://example.com").await;

        assert!(result.final_score.abs() < f64::EPSILON);
        assert_eq!(result.trust_level, TrustLevel::VeryLow);
        assert!(result.confidence.abs() < f64::EPSILON);
        assert!(!result.errors.is_empty());
        // All three categories are low.
        assert!(result.warnings.iter().any(|w| w.contains("security")));
        assert!(result.warnings.iter().any(|w| w.contains("reputation")));
        assert!(result.warnings.iter().any(|w| w.contains("compliance")));
    }

    #[tokio::test]
    async fn malformed_url_rejected_without_panic() {
        let engine = uniform_engine(1.0, MetricStatus::Success);
        let result = engine.score_website("not a url").await;

        assert!(result.final_score.abs() < f64::EPSILON);
        assert_eq!(result.trust_level, TrustLevel::VeryLow);
        assert!(result.confidence.abs() < f64::EPSILON);
        assert!(!result.errors.is_empty());
        assert!(result.detailed_metrics.is_empty());
    }

    #[tokio::test]
    async fn throwing_scorer_still_reaches_complete() {
        let security = MetricsGroup::new(
            "security",
            vec![
                WeightedScorer::new(ThrowingScorer, 0.40),
                WeightedScorer::new(
                    MockScorer { name: "s2", score: 1.0, status: MetricStatus::Success },
                    0.35,
                ),
                WeightedScorer::new(
                    MockScorer { name: "s3", score: 1.0, status: MetricStatus::Success },
                    0.25,
                ),
            ],
        );
        let rep = MetricsGroup::new(
            "reputation",
            vec![WeightedScorer::new(
                MockScorer { name: "r1", score: 1.0, status: MetricStatus::Success },
                1.0,
            )],
        );
        let comp = MetricsGroup::new(
            "compliance",
            vec![WeightedScorer::new(
                MockScorer { name: "c1", score: 1.0, status: MetricStatus::Success },
                1.0,
            )],
        );
        let engine =
            TrustScoringEngine::with_groups(ScoringConfig::default(), security, rep, comp);

        let result = engine.score_website("https://example.com").await;

        let thrown = result
            .detailed_metrics
            .iter()
            .find(|m| m.name == "throwing")
            .expect("metric for the throwing scorer");
        assert_eq!(thrown.status, MetricStatus::Error);
        assert!(thrown.score.abs() < f64::EPSILON);
        // security = 0.35 + 0.25 = 0.6; rep = comp = 1.0
        let expected = 0.6f64.mul_add(0.40, 1.0 * 0.35 + 1.0 * 0.25);
        assert!((result.final_score - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn weighted_score_stays_in_unit_interval() {
        // Deterministic pseudo-random scores; weights sum to 1, so the
        // final score must stay inside [0, 1] for every combination.
        let mut state: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            #[allow(clippy::cast_precision_loss)]
            let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
            unit
        };

        for _ in 0..50 {
            let scores: Vec<f64> = (0..9).map(|_| next()).collect();
            let mk = |name: &'static str, s: f64, w: f64| {
                WeightedScorer::new(
                    MockScorer { name, score: s, status: MetricStatus::Success },
                    w,
                )
            };
            let engine = TrustScoringEngine::with_groups(
                ScoringConfig::default(),
                MetricsGroup::new(
                    "security",
                    vec![
                        mk("s1", scores[0], 0.40),
                        mk("s2", scores[1], 0.35),
                        mk("s3", scores[2], 0.25),
                    ],
                ),
                MetricsGroup::new(
                    "reputation",
                    vec![
                        mk("r1", scores[3], 0.40),
                        mk("r2", scores[4], 0.30),
                        mk("r3", scores[5], 0.30),
                    ],
                ),
                MetricsGroup::new(
                    "compliance",
                    vec![
                        mk("c1", scores[6], 0.40),
                        mk("c2", scores[7], 0.30),
                        mk("c3", scores[8], 0.30),
                    ],
                ),
            );

            let result = engine.score_website("https://example.com").await;
            assert!(
                (0.0..=1.0).contains(&result.final_score),
                "final score {} out of range",
                result.final_score
            );
            assert_eq!(result.trust_level, TrustLevel::from_score(result.final_score));
        }
    }

    #[tokio::test]
    async fn mixed_outcomes_confidence_fraction() {
        // 6 successful positives + 3 errors -> confidence 6/9.
        let mk = |name: &'static str, score: f64, status: MetricStatus, w: f64| {
            WeightedScorer::new(MockScorer { name, score, status }, w)
        };
        let engine = TrustScoringEngine::with_groups(
            ScoringConfig::default(),
            MetricsGroup::new(
                "security",
                vec![
                    mk("s1", 1.0, MetricStatus::Success, 0.40),
                    mk("s2", 1.0, MetricStatus::Success, 0.35),
                    mk("s3", 0.0, MetricStatus::Error, 0.25),
                ],
            ),
            MetricsGroup::new(
                "reputation",
                vec![
                    mk("r1", 0.8, MetricStatus::Success, 0.40),
                    mk("r2", 0.9, MetricStatus::Success, 0.30),
                    mk("r3", 0.0, MetricStatus::Error, 0.30),
                ],
            ),
            MetricsGroup::new(
                "compliance",
                vec![
                    mk("c1", 0.7, MetricStatus::Success, 0.40),
                    mk("c2", 0.6, MetricStatus::Success, 0.30),
                    mk("c3", 0.0, MetricStatus::Error, 0.30),
                ],
            ),
        );

        let result = engine.score_website("https://example.com").await;
        assert!((result.confidence - 6.0 / 9.0).abs() < 1e-12);
        // Security group arithmetic from the contract: 0.4 + 0.35 = 0.75.
        assert!((result.security_score - 0.75).abs() < 1e-12);
    }

    #[tokio::test]
    async fn unnormalized_weights_are_clamped_not_rejected() {
        let config = ScoringConfig {
            weights: CategoryWeights { security: 1.0, reputation: 1.0, compliance: 1.0 },
            ..ScoringConfig::default()
        };
        let mk = |name: &'static str| {
            WeightedScorer::new(
                MockScorer { name, score: 1.0, status: MetricStatus::Success },
                1.0,
            )
        };
        let engine = TrustScoringEngine::with_groups(
            config,
            MetricsGroup::new("security", vec![mk("s1")]),
            MetricsGroup::new("reputation", vec![mk("r1")]),
            MetricsGroup::new("compliance", vec![mk("c1")]),
        );

        let result = engine.score_website("https://example.com").await;
        assert!((result.final_score - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.trust_level, TrustLevel::High);
    }

    #[tokio::test]
    async fn metric_order_is_group_then_scorer() {
        let engine = uniform_engine(1.0, MetricStatus::Success);
        let result = engine.score_website("https://example.com").await;
        let names: Vec<_> = result.detailed_metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["s1", "s2", "s3", "r1", "r2", "r3", "c1", "c2", "c3"]);
    }
}
