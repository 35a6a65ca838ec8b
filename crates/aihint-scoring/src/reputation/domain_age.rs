//! Registration-age analysis from the WHOIS record.

use std::time::Instant;

use aihint_core::MetricResult;
use async_trait::async_trait;
use serde_json::json;

use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};
use crate::whois::{WhoisClient, WhoisInfo};

/// Registrars treated as established; anything else takes a small
/// deduction.
const REPUTABLE_REGISTRARS: &[&str] = &[
    "godaddy",
    "namecheap",
    "google domains",
    "cloudflare",
    "network solutions",
    "register.com",
    "1&1 ionos",
    "markmonitor",
    "gandi",
];

/// Scores the domain's registration age: freshly registered domains are
/// the strongest phishing signal this category has.
pub struct DomainAgeAnalyzer {
    whois: WhoisClient,
}

impl DomainAgeAnalyzer {
    /// Analyzer over the shared WHOIS client.
    #[must_use]
    pub fn new(whois: WhoisClient) -> Self {
        Self { whois }
    }
}

#[async_trait]
impl Scorer for DomainAgeAnalyzer {
    fn name(&self) -> &'static str {
        "domain_age"
    }

    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome {
        let start = Instant::now();

        let info = match self.whois.lookup(&target.host).await {
            Ok(info) => info,
            Err(e) => {
                return ScorerOutcome::from_metric(MetricResult::error(
                    self.name(),
                    format!("WHOIS lookup failed: {e}"),
                    elapsed_ms(start),
                ))
                .with_error(format!("domain_age: {e}"));
            }
        };

        let (score, issues) = age_score(&info);
        let details = json!({
            "age_days": info.age_days(),
            "days_until_expiry": info.days_to_expiry(),
            "registrar": info.registrar,
            "issues": issues,
        });

        let message = info.age_days().map_or_else(
            || "registration date unknown".to_string(),
            |age| format!("domain registered {age} days ago"),
        );

        let mut out = ScorerOutcome::from_metric(MetricResult::success(
            self.name(),
            score,
            message,
            details,
            elapsed_ms(start),
        ));
        out.warnings = issues
            .into_iter()
            .map(|i| format!("domain_age: {i}"))
            .collect();
        out
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Age banding with deductions for churn, imminent expiry, and an
/// unrecognized registrar.
fn age_score(info: &WhoisInfo) -> (f64, Vec<String>) {
    let mut issues = Vec::new();

    let mut score: f64 = match info.age_days() {
        Some(age) if age < 1 => {
            issues.push("domain created today".to_string());
            0.1
        }
        Some(age) if age < 7 => {
            issues.push("domain created this week".to_string());
            0.2
        }
        Some(age) if age < 30 => {
            issues.push("domain created this month".to_string());
            0.4
        }
        Some(age) if age < 90 => {
            issues.push("domain created this quarter".to_string());
            0.6
        }
        Some(age) if age < 365 => {
            issues.push("domain created this year".to_string());
            0.8
        }
        Some(_) | None => 1.0,
    };

    if info.updated_within_days(7) {
        issues.push("domain record recently updated".to_string());
        score -= 0.1;
    }

    match info.days_to_expiry() {
        Some(days) if days < 30 => {
            issues.push("domain expires soon".to_string());
            score -= 0.2;
        }
        Some(days) if days < 90 => {
            issues.push("domain expires within three months".to_string());
            score -= 0.1;
        }
        _ => {}
    }

    let reputable = info.registrar.as_ref().is_some_and(|r| {
        let lower = r.to_lowercase();
        REPUTABLE_REGISTRARS.iter().any(|known| lower.contains(known))
    });
    if !reputable {
        issues.push("unknown or less reputable registrar".to_string());
        score -= 0.1;
    }

    (score.max(0.0), issues)
}
