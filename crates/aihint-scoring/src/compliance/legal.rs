//! Legal compliance checks: terms of service, cookie consent, legal notices.

use std::time::Instant;

use aihint_core::MetricResult;
use async_trait::async_trait;
use serde_json::json;

use crate::probe::HttpProbe;
use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};

const TERMS_PATHS: &[&str] = &[
    "/terms",
    "/terms-of-service",
    "/terms_of_service",
    "/terms.html",
    "/legal/terms",
    "/agreement",
    "/user-agreement",
];

const TERMS_SECTIONS: &[&str] = &[
    "liability",
    "disclaimer",
    "governing law",
    "jurisdiction",
    "user responsibilities",
    "prohibited uses",
    "termination",
    "modifications",
];

const COOKIE_BANNER_INDICATORS: &[&str] = &[
    "cookie consent",
    "cookie banner",
    "accept cookies",
    "cookie notice",
    "gdpr consent",
    "cookie policy",
];

const COOKIE_POLICY_PATHS: &[&str] = &[
    "/cookie-policy",
    "/cookie_policy",
    "/cookies",
    "/cookie.html",
];

const CONSENT_MECHANISMS: &[&str] = &["accept", "decline", "settings"];

const NOTICE_PATHS: &[&str] = &["/legal", "/legal-notice", "/disclaimer"];

const LEGAL_LANGUAGE: &[&str] = &["liability", "disclaimer", "jurisdiction", "governing law"];

/// Checks three legal surfaces of a site and averages them: terms of
/// service content, cookie consent, and standalone legal notices.
///
/// A sub-check that cannot run (homepage unreachable) contributes a
/// neutral 0.5 instead of dragging the category down.
pub struct LegalComplianceChecker {
    probe: HttpProbe,
}

impl LegalComplianceChecker {
    /// Checker over the shared probe.
    #[must_use]
    pub fn new(probe: HttpProbe) -> Self {
        Self { probe }
    }

    async fn terms_score(&self, target: &ScoreTarget) -> (f64, serde_json::Value) {
        let Some(page) = self.probe.find_first_live(target, TERMS_PATHS).await else {
            return (0.3, json!({ "terms_url": null }));
        };

        let lower = page.body_lower();
        let sections_found: Vec<&str> = TERMS_SECTIONS
            .iter()
            .filter(|s| lower.contains(**s))
            .copied()
            .collect();

        #[allow(clippy::cast_precision_loss)]
        let mut score = sections_found.len() as f64 * 0.1;

        let word_count = page.body.split_whitespace().count();
        if word_count > 1000 {
            score += 0.2;
        } else if word_count < 500 {
            score -= 0.1;
        }

        let details = json!({
            "terms_url": page.url,
            "sections_found": sections_found,
            "word_count": word_count,
        });
        (score.clamp(0.0, 1.0), details)
    }

    async fn cookie_score(
        &self,
        target: &ScoreTarget,
    ) -> (f64, serde_json::Value, Option<String>) {
        let Ok(homepage) = self.probe.fetch_homepage(target).await else {
            return (
                0.5,
                json!({ "banner": null }),
                Some("legal_compliance: homepage unreachable, cookie check skipped".to_string()),
            );
        };

        let lower = homepage.body_lower();
        let has_banner = COOKIE_BANNER_INDICATORS.iter().any(|i| lower.contains(i));
        let mut score: f64 = if has_banner { 0.5 } else { 0.2 };

        let policy_page = self.probe.find_first_live(target, COOKIE_POLICY_PATHS).await;
        if policy_page.is_some() {
            score += 0.3;
        }

        let has_consent_controls =
            lower.contains("cookie") && CONSENT_MECHANISMS.iter().any(|m| lower.contains(m));
        if has_consent_controls {
            score += 0.2;
        }

        let details = json!({
            "banner": has_banner,
            "policy_page": policy_page.map(|p| p.url),
            "consent_controls": has_consent_controls,
        });
        (score.min(1.0), details, None)
    }

    async fn notices_score(&self, target: &ScoreTarget) -> (f64, serde_json::Value) {
        let mut found = Vec::new();
        let mut score: f64 = 0.0;

        for path in NOTICE_PATHS {
            let url = self.probe.url_for(target, path);
            let Ok(page) = self.probe.fetch(&url).await else {
                continue;
            };
            if !page.status.is_success() {
                continue;
            }
            if found.is_empty() {
                score = 0.5;
            }
            let lower = page.body_lower();
            if LEGAL_LANGUAGE.iter().any(|t| lower.contains(t)) {
                score += 0.2;
            }
            found.push(page.url);
        }

        (score.min(1.0), json!({ "notice_pages": found }))
    }
}

#[async_trait]
impl Scorer for LegalComplianceChecker {
    fn name(&self) -> &'static str {
        "legal_compliance"
    }

    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome {
        let start = Instant::now();

        let (terms, cookies, notices) = tokio::join!(
            self.terms_score(target),
            self.cookie_score(target),
            self.notices_score(target),
        );
        let (terms_score, terms_details) = terms;
        let (cookie_score, cookie_details, cookie_warning) = cookies;
        let (notices_score, notices_details) = notices;

        let score = (terms_score + cookie_score + notices_score) / 3.0;

        let mut out = ScorerOutcome::from_metric(MetricResult::success(
            self.name(),
            score,
            format!(
                "terms {terms_score:.2}, cookies {cookie_score:.2}, notices {notices_score:.2}"
            ),
            json!({
                "terms": { "score": terms_score, "details": terms_details },
                "cookies": { "score": cookie_score, "details": cookie_details },
                "legal_notices": { "score": notices_score, "details": notices_details },
            }),
            elapsed_ms(start),
        ));
        if let Some(warning) = cookie_warning {
            out = out.with_warning(warning);
        }
        out
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn target() -> ScoreTarget {
        ScoreTarget::parse("https://example.com").unwrap()
    }

    fn checker(base: &str) -> LegalComplianceChecker {
        LegalComplianceChecker::new(HttpProbe::with_defaults().unwrap().base(base))
    }

    fn full_terms() -> String {
        let mut body = String::from(
            "Terms of Service. Liability is limited; see the disclaimer. \
             Governing law and jurisdiction: Delaware. User responsibilities \
             and prohibited uses are listed below, along with termination \
             and modifications clauses. ",
        );
        for _ in 0..1100 {
            body.push_str("word ");
        }
        body
    }

    #[tokio::test]
    async fn full_legal_surface_scores_high() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/terms"))
            .respond_with(ResponseTemplate::new(200).set_body_string(full_terms()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "We use cookie consent. Accept or decline cookies in settings.",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/cookie-policy"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Cookie policy text"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/legal"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("Legal notice: liability limits"),
            )
            .mount(&server)
            .await;

        let outcome = checker(&server.uri()).score(&target()).await;
        let metric = &outcome.metrics[0];
        // terms 1.0, cookies 1.0, notices 0.7 -> 0.9
        assert!((metric.score - 0.9).abs() < 1e-9);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn missing_terms_falls_back_to_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>Plain</html>"))
            .mount(&server)
            .await;

        let outcome = checker(&server.uri()).score(&target()).await;
        // terms 0.3, cookies 0.2, notices 0.0 -> 0.1666..
        assert!((outcome.metrics[0].score - 0.5 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unreachable_homepage_neutralizes_cookie_check() {
        let checker = LegalComplianceChecker::new(
            HttpProbe::with_defaults().unwrap().base("http://127.0.0.1:1"),
        );
        let outcome = checker.score(&target()).await;
        // terms 0.3, cookies 0.5 neutral, notices 0.0 -> 0.2666..
        assert!((outcome.metrics[0].score - 0.8 / 3.0).abs() < 1e-9);
        assert!(!outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn thin_terms_page_penalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/terms"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("Liability: none. Short page."),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let (score, details) = checker(&server.uri()).terms_score(&target()).await;
        // 1 section (0.1) - short (-0.1) = 0.0
        assert!(score.abs() < f64::EPSILON);
        assert_eq!(details["sections_found"].as_array().unwrap().len(), 1);
    }
}
