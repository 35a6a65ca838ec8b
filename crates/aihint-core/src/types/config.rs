//! Scoring configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Relative weight of each metric category in the final score.
///
/// Weights are not normalized or validated here; the engine clamps the
/// weighted sum defensively and warns when they do not sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryWeights {
    /// Weight of the security category
    pub security: f64,
    /// Weight of the reputation category
    pub reputation: f64,
    /// Weight of the compliance category
    pub compliance: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            security: 0.40,
            reputation: 0.35,
            compliance: 0.25,
        }
    }
}

impl CategoryWeights {
    /// Sum of all category weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.security + self.reputation + self.compliance
    }
}

/// Credentials for optional third-party threat intelligence APIs.
///
/// A missing credential degrades the corresponding check to skipped/neutral,
/// never to an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiCredentials {
    /// Google Safe Browsing v4 API key
    pub safe_browsing_key: Option<String>,
    /// PhishTank application key
    pub phishtank_app_key: Option<String>,
}

/// Per-scorer enable flags. Everything is enabled by default; a disabled
/// scorer is reported as a skipped metric at a neutral score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerToggles {
    /// SSL/TLS validator
    pub ssl_tls: bool,
    /// Security headers analyzer
    pub security_headers: bool,
    /// Malware/phishing checker
    pub malware: bool,
    /// Domain reputation checker
    pub domain_reputation: bool,
    /// Domain age analyzer
    pub domain_age: bool,
    /// Incident tracker
    pub incidents: bool,
    /// Privacy policy analyzer
    pub privacy_policy: bool,
    /// Contact validator
    pub contact: bool,
    /// Legal compliance checker
    pub legal_compliance: bool,
}

impl Default for ScorerToggles {
    fn default() -> Self {
        Self {
            ssl_tls: true,
            security_headers: true,
            malware: true,
            domain_reputation: true,
            domain_age: true,
            incidents: true,
            privacy_policy: true,
            contact: true,
            legal_compliance: true,
        }
    }
}

/// Engine configuration.
///
/// Read-only for the duration of a call; cloning is cheap and a single
/// instance may back any number of concurrent `score_website` calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Per-scorer timeout in seconds
    pub scorer_timeout_secs: u64,
    /// Category weights for the final score
    pub weights: CategoryWeights,
    /// Optional third-party API credentials
    pub credentials: ApiCredentials,
    /// Per-scorer enable flags
    pub scorers: ScorerToggles,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            scorer_timeout_secs: 10,
            weights: CategoryWeights::default(),
            credentials: ApiCredentials::default(),
            scorers: ScorerToggles::default(),
        }
    }
}

impl ScoringConfig {
    /// Per-scorer timeout as a [`Duration`].
    #[must_use]
    pub const fn scorer_timeout(&self) -> Duration {
        Duration::from_secs(self.scorer_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let w = CategoryWeights::default();
        assert!((w.sum() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn defaults_enable_every_scorer() {
        let t = ScorerToggles::default();
        assert!(t.ssl_tls && t.security_headers && t.malware);
        assert!(t.domain_reputation && t.domain_age && t.incidents);
        assert!(t.privacy_policy && t.contact && t.legal_compliance);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ScoringConfig = serde_json::from_str(
            r#"{"scorer_timeout_secs": 5, "scorers": {"malware": false}}"#,
        )
        .unwrap();
        assert_eq!(config.scorer_timeout(), Duration::from_secs(5));
        assert!(!config.scorers.malware);
        assert!(config.scorers.ssl_tls);
        assert!((config.weights.security - 0.40).abs() < f64::EPSILON);
    }
}
