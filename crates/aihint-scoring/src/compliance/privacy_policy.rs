//! Privacy policy discovery and content analysis.

use std::time::Instant;

use aihint_core::MetricResult;
use async_trait::async_trait;
use serde_json::json;

use crate::probe::{FetchedPage, HttpProbe};
use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};

/// Conventional policy locations, probed in order.
const POLICY_PATHS: &[&str] = &[
    "/privacy",
    "/privacy-policy",
    "/privacy_policy",
    "/privacy.html",
    "/legal/privacy",
    "/privacy-notice",
    "/data-protection",
    "/gdpr",
];

const LINK_KEYWORDS: &[&str] = &["privacy", "data-protection", "gdpr"];

const REQUIRED_SECTIONS: &[&str] = &[
    "data collection",
    "data usage",
    "data sharing",
    "cookies",
    "contact information",
    "data retention",
    "user rights",
    "data security",
];

const GDPR_INDICATORS: &[&str] = &[
    "gdpr",
    "general data protection regulation",
    "data protection officer",
    "lawful basis",
    "data subject rights",
    "consent",
    "legitimate interest",
];

const CCPA_INDICATORS: &[&str] = &[
    "ccpa",
    "california consumer privacy act",
    "do not sell",
    "opt-out",
    "consumer rights",
];

const LEGAL_TERMS: &[&str] = &[
    "terms of service",
    "terms and conditions",
    "legal notice",
    "disclaimer",
    "liability",
    "jurisdiction",
];

const DATE_MARKERS: &[&str] = &["last updated", "effective date", "updated"];

/// Finds the site's privacy policy (conventional paths, then homepage
/// links) and scores its content by keyword density.
///
/// A site without any policy scores 0 with `Success` status: the absence
/// was measured, nothing failed.
pub struct PrivacyPolicyAnalyzer {
    probe: HttpProbe,
}

impl PrivacyPolicyAnalyzer {
    /// Analyzer over the shared probe.
    #[must_use]
    pub fn new(probe: HttpProbe) -> Self {
        Self { probe }
    }

    async fn discover(&self, target: &ScoreTarget) -> Option<FetchedPage> {
        if let Some(page) = self.probe.find_first_live(target, POLICY_PATHS).await {
            return Some(page);
        }
        let homepage = self.probe.fetch_homepage(target).await.ok()?;
        self.probe
            .find_linked_page(target, &homepage, LINK_KEYWORDS)
            .await
    }
}

#[async_trait]
impl Scorer for PrivacyPolicyAnalyzer {
    fn name(&self) -> &'static str {
        "privacy_policy"
    }

    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome {
        let start = Instant::now();

        let Some(page) = self.discover(target).await else {
            return ScorerOutcome::from_metric(MetricResult::success(
                self.name(),
                0.0,
                "no privacy policy found",
                json!({ "policy_url": null }),
                elapsed_ms(start),
            ))
            .with_warning("privacy_policy: no privacy policy found");
        };

        let (score, details) = analyze_policy(&page.body);
        ScorerOutcome::from_metric(MetricResult::success(
            self.name(),
            score,
            format!("privacy policy at {} scored {score:.2}", page.url),
            json!({ "policy_url": page.url, "analysis": details }),
            elapsed_ms(start),
        ))
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Keyword-density scoring of the policy text.
fn analyze_policy(content: &str) -> (f64, serde_json::Value) {
    let lower = content.to_lowercase();
    let mut score: f64 = 0.0;

    let sections_found: Vec<&str> = REQUIRED_SECTIONS
        .iter()
        .filter(|s| lower.contains(**s))
        .copied()
        .collect();
    #[allow(clippy::cast_precision_loss)]
    {
        score += sections_found.len() as f64 * 0.1;
    }

    let gdpr_found = GDPR_INDICATORS.iter().filter(|i| lower.contains(**i)).count();
    if gdpr_found >= 3 {
        score += 0.2;
    } else if gdpr_found >= 1 {
        score += 0.1;
    }

    let ccpa_found = CCPA_INDICATORS.iter().filter(|i| lower.contains(**i)).count();
    if ccpa_found >= 2 {
        score += 0.1;
    }

    let has_contact = lower.contains('@') || lower.contains("phone");
    if has_contact {
        score += 0.1;
    }

    let dated = DATE_MARKERS.iter().any(|m| lower.contains(m));
    if dated {
        score += 0.1;
    }

    let word_count = content.split_whitespace().count();
    if word_count > 2000 {
        score += 0.1;
    } else if word_count > 1000 {
        score += 0.05;
    } else if word_count < 500 {
        score -= 0.1;
    }

    let legal_found = LEGAL_TERMS.iter().filter(|t| lower.contains(**t)).count();
    if legal_found >= 3 {
        score += 0.1;
    }

    let details = json!({
        "sections_found": sections_found,
        "gdpr_indicators": gdpr_found,
        "ccpa_indicators": ccpa_found,
        "has_contact": has_contact,
        "dated": dated,
        "word_count": word_count,
    });
    (score.clamp(0.0, 1.0), details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aihint_core::MetricStatus;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target() -> ScoreTarget {
        ScoreTarget::parse("https://example.com").unwrap()
    }

    fn rich_policy() -> String {
        let mut body = String::from(
            "Privacy Policy. Last updated: January 2026. \
             This policy covers data collection, data usage, data sharing, \
             cookies, contact information, data retention, user rights, and \
             data security. Under the GDPR (General Data Protection \
             Regulation) our data protection officer handles data subject \
             rights requests; we process on the lawful basis of consent. \
             California residents: see our CCPA notice and do not sell page. \
             Contact privacy@example.com. See also our terms of service, \
             disclaimer, and liability sections. ",
        );
        // Pad past the 2000-word bonus threshold.
        for _ in 0..2100 {
            body.push_str("word ");
        }
        body
    }

    #[test]
    fn rich_policy_scores_high() {
        let (score, details) = analyze_policy(&rich_policy());
        // 8 sections (0.8) + gdpr>=3 (0.2) + ccpa>=2 (0.1) + contact (0.1)
        // + dated (0.1) + length (0.1) + legal>=3 (0.1), clamped
        assert!((score - 1.0).abs() < f64::EPSILON);
        assert_eq!(details["sections_found"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn thin_policy_penalized() {
        let (score, _) = analyze_policy("We respect your privacy.");
        assert!(score.abs() < f64::EPSILON);
    }

    #[test]
    fn partial_policy_partial_score() {
        let text = "We describe data collection and cookies here. \
                    Contact us at privacy@example.com.";
        let (score, _) = analyze_policy(text);
        // 2 sections (0.2) + contact (0.1) - short (-0.1) = 0.2
        assert!((score - 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn discovers_policy_at_conventional_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/privacy-policy"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rich_policy()))
            .mount(&server)
            .await;

        let probe = HttpProbe::with_defaults().unwrap().base(server.uri());
        let analyzer = PrivacyPolicyAnalyzer::new(probe);

        let outcome = analyzer.score(&target()).await;
        let metric = &outcome.metrics[0];
        assert_eq!(metric.status, MetricStatus::Success);
        assert!((metric.score - 1.0).abs() < f64::EPSILON);
        assert!(metric.details["policy_url"]
            .as_str()
            .unwrap()
            .ends_with("/privacy-policy"));
    }

    #[tokio::test]
    async fn discovers_policy_via_homepage_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><a href="/p/datenschutz-privacy">Privacy</a></html>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/p/datenschutz-privacy"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rich_policy()))
            .mount(&server)
            .await;

        let probe = HttpProbe::with_defaults().unwrap().base(server.uri());
        let analyzer = PrivacyPolicyAnalyzer::new(probe);

        let outcome = analyzer.score(&target()).await;
        assert!((outcome.metrics[0].score - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn absent_policy_scores_zero_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let probe = HttpProbe::with_defaults().unwrap().base(server.uri());
        let analyzer = PrivacyPolicyAnalyzer::new(probe);

        let outcome = analyzer.score(&target()).await;
        let metric = &outcome.metrics[0];
        assert_eq!(metric.status, MetricStatus::Success);
        assert!(metric.score.abs() < f64::EPSILON);
        assert!(!outcome.warnings.is_empty());
    }
}
