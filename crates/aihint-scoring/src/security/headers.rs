//! HTTP security header analysis.

use std::time::Instant;

use aihint_core::MetricResult;
use async_trait::async_trait;
use serde_json::json;

use crate::probe::{FetchedPage, HttpProbe};
use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};

/// Fixed rubric: header name and its weight in the aggregate.
const HEADER_RUBRIC: &[(&str, f64)] = &[
    ("strict-transport-security", 0.25),
    ("content-security-policy", 0.20),
    ("x-frame-options", 0.15),
    ("x-content-type-options", 0.10),
    ("referrer-policy", 0.10),
    ("permissions-policy", 0.10),
    ("x-xss-protection", 0.05),
    ("cache-control", 0.05),
];

/// Scores a site's response headers against a fixed security rubric.
///
/// Every header is always judged; an absent header scores 0 for its slot
/// rather than being dropped from the denominator.
pub struct SecurityHeadersAnalyzer {
    probe: HttpProbe,
}

impl SecurityHeadersAnalyzer {
    /// Analyzer over the shared probe.
    #[must_use]
    pub fn new(probe: HttpProbe) -> Self {
        Self { probe }
    }

    fn analyze(page: &FetchedPage) -> (f64, serde_json::Value) {
        let mut weighted = 0.0;
        let mut present = 0usize;
        let mut details = serde_json::Map::new();

        for (name, weight) in HEADER_RUBRIC {
            let value = page.header(name).unwrap_or("");
            let score = score_header(name, value);
            if !value.is_empty() {
                present += 1;
            }
            weighted += score * weight;
            details.insert(
                (*name).to_string(),
                json!({
                    "present": !value.is_empty(),
                    "value": value,
                    "score": score,
                    "weight": weight,
                }),
            );
        }

        // Weights sum to 1.0, so the weighted sum is already the mean.
        let score = weighted.clamp(0.0, 1.0);
        let breakdown = json!({
            "headers_analyzed": HEADER_RUBRIC.len(),
            "headers_present": present,
            "header_details": details,
        });
        (score, breakdown)
    }
}

#[async_trait]
impl Scorer for SecurityHeadersAnalyzer {
    fn name(&self) -> &'static str {
        "security_headers"
    }

    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome {
        let start = Instant::now();
        match self.probe.fetch_homepage(target).await {
            Ok(page) => {
                let (score, details) = Self::analyze(&page);
                let elapsed = elapsed_ms(start);
                ScorerOutcome::from_metric(MetricResult::success(
                    self.name(),
                    score,
                    format!("security headers scored {score:.2}"),
                    details,
                    elapsed,
                ))
            }
            Err(e) => ScorerOutcome::from_metric(MetricResult::error(
                self.name(),
                format!("failed to fetch headers: {e}"),
                elapsed_ms(start),
            ))
            .with_error(format!("security_headers: {e}")),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn score_header(name: &str, value: &str) -> f64 {
    if value.is_empty() {
        return 0.0;
    }
    match name {
        "strict-transport-security" => hsts_directive_score(value),
        "content-security-policy" => csp_score(value),
        "x-frame-options" => x_frame_options_score(value),
        "x-content-type-options" => {
            if value.eq_ignore_ascii_case("nosniff") {
                1.0
            } else {
                0.0
            }
        }
        "referrer-policy" => referrer_policy_score(value),
        "permissions-policy" => {
            #[allow(clippy::cast_precision_loss)]
            let features = value.split(',').count() as f64;
            (features * 0.1).min(1.0)
        }
        "x-xss-protection" => xss_protection_score(value),
        "cache-control" => cache_control_score(value),
        _ => 0.0,
    }
}

/// HSTS directive rubric, shared with the TLS scorer: max-age banding
/// (1 year 0.5, 1 day 0.4, 1 hour 0.3) plus includeSubDomains 0.3 and
/// preload 0.2.
pub(crate) fn hsts_directive_score(value: &str) -> f64 {
    let mut score: f64 = 0.0;
    let mut max_age: Option<i64> = None;
    let mut include_subdomains = false;
    let mut preload = false;

    for directive in value.split(';') {
        let directive = directive.trim();
        if let Some((key, val)) = directive.split_once('=') {
            if key.trim().eq_ignore_ascii_case("max-age") {
                max_age = val.trim().parse().ok();
            }
        } else if directive.eq_ignore_ascii_case("includesubdomains") {
            include_subdomains = true;
        } else if directive.eq_ignore_ascii_case("preload") {
            preload = true;
        }
    }

    if let Some(age) = max_age {
        if age >= 31_536_000 {
            score += 0.5;
        } else if age >= 86_400 {
            score += 0.4;
        } else if age >= 3_600 {
            score += 0.3;
        }
    }
    if include_subdomains {
        score += 0.3;
    }
    if preload {
        score += 0.2;
    }
    score.min(1.0)
}

fn csp_score(value: &str) -> f64 {
    let mut score: f64 = 0.0;
    let lower = value.to_lowercase();

    for directive in ["default-src", "script-src", "style-src", "img-src"] {
        if lower.contains(directive) {
            score += 0.2;
        }
    }
    if lower.contains("unsafe-inline") {
        score -= 0.1;
    }
    if lower.contains("unsafe-eval") {
        score -= 0.1;
    }
    score.clamp(0.0, 1.0)
}

fn x_frame_options_score(value: &str) -> f64 {
    let lower = value.to_lowercase();
    if lower == "deny" {
        1.0
    } else if lower.starts_with("sameorigin") {
        0.8
    } else if lower.starts_with("allow-from") {
        0.5
    } else {
        0.3
    }
}

fn referrer_policy_score(value: &str) -> f64 {
    match value.to_lowercase().as_str() {
        "no-referrer" | "same-origin" => 1.0,
        "strict-origin" | "strict-origin-when-cross-origin" => 0.8,
        "origin" | "origin-when-cross-origin" => 0.6,
        _ => 0.3,
    }
}

fn xss_protection_score(value: &str) -> f64 {
    let lower = value.to_lowercase();
    if lower.contains('1') && lower.contains("mode=block") {
        1.0
    } else if lower.contains('1') {
        0.5
    } else {
        0.0
    }
}

fn cache_control_score(value: &str) -> f64 {
    let lower = value.to_lowercase();
    let mut score: f64 = 0.0;
    if lower.contains("no-store") {
        score += 0.5;
    }
    if lower.contains("no-cache") {
        score += 0.3;
    }
    if lower.contains("private") {
        score += 0.2;
    }
    score.min(1.0)
}
