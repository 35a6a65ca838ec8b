//! Malware and phishing blocklist lookups.

use std::time::{Duration, Instant};

use aihint_core::{ApiCredentials, MetricResult, MetricStatus, Result, ScoreError};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};

const SAFE_BROWSING_BASE: &str = "https://safebrowsing.googleapis.com";
const URLHAUS_BASE: &str = "https://urlhaus-api.abuse.ch";
const PHISHTANK_BASE: &str = "https://checkurl.phishtank.com";

/// Outcome of one blocklist service lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServiceVerdict {
    Clean,
    Listed,
    Skipped,
    Failed,
}

impl ServiceVerdict {
    const fn label(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Listed => "listed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

/// Queries external threat feeds: Google Safe Browsing (keyed), URLhaus
/// (keyless), and PhishTank (optional app key).
///
/// A feed that cannot run for lack of credentials is skipped, never an
/// error; the score is the mean over the feeds that answered.
pub struct MalwareChecker {
    client: reqwest::Client,
    credentials: ApiCredentials,
    safe_browsing_base: String,
    urlhaus_base: String,
    phishtank_base: String,
}

impl MalwareChecker {
    /// Checker with the given credentials and timeout.
    pub fn new(credentials: ApiCredentials, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("aihint/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScoreError::Http(e.to_string()))?;
        Ok(Self {
            client,
            credentials,
            safe_browsing_base: SAFE_BROWSING_BASE.to_string(),
            urlhaus_base: URLHAUS_BASE.to_string(),
            phishtank_base: PHISHTANK_BASE.to_string(),
        })
    }

    /// Override the Safe Browsing endpoint. Testing seam.
    #[must_use]
    pub fn safe_browsing_base(mut self, base: impl Into<String>) -> Self {
        self.safe_browsing_base = base.into();
        self
    }

    /// Override the URLhaus endpoint. Testing seam.
    #[must_use]
    pub fn urlhaus_base(mut self, base: impl Into<String>) -> Self {
        self.urlhaus_base = base.into();
        self
    }

    /// Override the PhishTank endpoint. Testing seam.
    #[must_use]
    pub fn phishtank_base(mut self, base: impl Into<String>) -> Self {
        self.phishtank_base = base.into();
        self
    }

    async fn check_safe_browsing(&self, target: &ScoreTarget) -> (ServiceVerdict, Option<String>) {
        let Some(key) = self.credentials.safe_browsing_key.as_deref() else {
            debug!("Safe Browsing key not configured, skipping");
            return (ServiceVerdict::Skipped, None);
        };

        let url = format!(
            "{}/v4/threatMatches:find?key={key}",
            self.safe_browsing_base
        );
        let body = json!({
            "client": { "clientId": "aihint", "clientVersion": env!("CARGO_PKG_VERSION") },
            "threatInfo": {
                "threatTypes": [
                    "MALWARE", "SOCIAL_ENGINEERING", "UNWANTED_SOFTWARE",
                    "POTENTIALLY_HARMFUL_APPLICATION"
                ],
                "platformTypes": ["ANY_PLATFORM"],
                "threatEntryTypes": ["URL"],
                "threatEntries": [{ "url": target.url.as_str() }]
            }
        });

        match self.post_json(&url, &body).await {
            Ok(v) => {
                if v.get("matches").and_then(Value::as_array).is_some_and(|m| !m.is_empty()) {
                    (ServiceVerdict::Listed, None)
                } else {
                    (ServiceVerdict::Clean, None)
                }
            }
            Err(e) => {
                debug!(error = %e, "Safe Browsing lookup failed");
                (ServiceVerdict::Failed, Some(e.to_string()))
            }
        }
    }

    async fn check_urlhaus(&self, target: &ScoreTarget) -> (ServiceVerdict, Option<String>) {
        let url = format!("{}/v1/host/", self.urlhaus_base);
        let form = [("host", target.host.as_str())];

        match self.post_form(&url, &form).await {
            Ok(v) => match v.get("query_status").and_then(Value::as_str) {
                Some("ok") => (ServiceVerdict::Listed, None),
                Some("no_results") => (ServiceVerdict::Clean, None),
                other => (
                    ServiceVerdict::Failed,
                    Some(format!("unexpected query_status {other:?}")),
                ),
            },
            Err(e) => {
                debug!(error = %e, "URLhaus lookup failed");
                (ServiceVerdict::Failed, Some(e.to_string()))
            }
        }
    }

    async fn check_phishtank(&self, target: &ScoreTarget) -> (ServiceVerdict, Option<String>) {
        let url = format!("{}/checkurl/", self.phishtank_base);
        let mut form = vec![
            ("url", target.url.as_str().to_string()),
            ("format", "json".to_string()),
        ];
        if let Some(key) = self.credentials.phishtank_app_key.as_deref() {
            form.push(("app_key", key.to_string()));
        }

        match self.post_form(&url, &form).await {
            Ok(v) => {
                let results = &v["results"];
                let in_database = results["in_database"].as_bool().unwrap_or(false);
                let valid = results["valid"].as_bool().unwrap_or(false)
                    || results["valid"].as_str() == Some("true");
                if in_database && valid {
                    (ServiceVerdict::Listed, None)
                } else {
                    (ServiceVerdict::Clean, None)
                }
            }
            Err(e) => {
                debug!(error = %e, "PhishTank lookup failed");
                (ServiceVerdict::Failed, Some(e.to_string()))
            }
        }
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ScoreError::Http(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn post_form<T: serde::Serialize + ?Sized>(&self, url: &str, form: &T) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| ScoreError::Http(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScoreError::Api {
                code: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ScoreError::Http(e.to_string()))
    }
}

#[async_trait]
impl Scorer for MalwareChecker {
    fn name(&self) -> &'static str {
        "malware"
    }

    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome {
        let start = Instant::now();

        let ((safe_browsing, sb_failure), (urlhaus, uh_failure), (phishtank, pt_failure)) = tokio::join!(
            self.check_safe_browsing(target),
            self.check_urlhaus(target),
            self.check_phishtank(target),
        );

        let verdicts = [
            ("safe_browsing", safe_browsing, sb_failure),
            ("urlhaus", urlhaus, uh_failure),
            ("phishtank", phishtank, pt_failure),
        ];

        let mut sum = 0.0;
        let mut answered = 0u32;
        let mut listings = Vec::new();
        let mut failures = Vec::new();
        for (service, verdict, failure) in &verdicts {
            match verdict {
                ServiceVerdict::Clean => {
                    sum += 1.0;
                    answered += 1;
                }
                ServiceVerdict::Listed => {
                    answered += 1;
                    listings.push(*service);
                }
                ServiceVerdict::Skipped => {}
                ServiceVerdict::Failed => {
                    let reason = failure.as_deref().unwrap_or("unknown error");
                    failures.push(format!("malware: {service} check failed: {reason}"));
                }
            }
        }

        let details = json!({
            "safe_browsing": safe_browsing.label(),
            "urlhaus": urlhaus.label(),
            "phishtank": phishtank.label(),
            "listings": listings,
        });
        let elapsed = elapsed_ms(start);

        if answered == 0 {
            let mut out = ScorerOutcome::from_metric(MetricResult::new(
                self.name(),
                MetricStatus::Skipped,
                0.5,
                "no threat feed available (missing credentials or unreachable)",
                details,
                elapsed,
            ))
            .with_warning("malware: no threat feed available");
            out.warnings.extend(failures);
            return out;
        }

        let score = sum / f64::from(answered);
        let mut out = if listings.is_empty() {
            ScorerOutcome::from_metric(MetricResult::success(
                self.name(),
                score,
                format!("clean across {answered} threat feeds"),
                details,
                elapsed,
            ))
        } else {
            let message = format!("listed by {}", listings.join(", "));
            ScorerOutcome::from_metric(MetricResult::warning(
                self.name(),
                score,
                message.clone(),
                details,
                elapsed,
            ))
            .with_warning(format!("malware: {message}"))
        };
        out.warnings.extend(failures);
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

    fn creds(safe_browsing: bool) -> ApiCredentials {
        ApiCredentials {
            safe_browsing_key: safe_browsing.then(|| "test-key".to_string()),
            phishtank_app_key: None,
        }
    }

    async fn mock_urlhaus(server: &MockServer, status: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/host/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "query_status": status })),
            )
            .mount(server)
            .await;
    }

    async fn mock_phishtank(server: &MockServer, in_database: bool) {
        Mock::given(method("POST"))
            .and(path("/checkurl/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": { "in_database": in_database, "valid": in_database }
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn clean_across_feeds_scores_one() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/threatMatches:find"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        mock_urlhaus(&server, "no_results").await;
        mock_phishtank(&server, false).await;

        let checker = MalwareChecker::new(creds(true), Duration::from_secs(5))
            .unwrap()
            .safe_browsing_base(server.uri())
            .urlhaus_base(server.uri())
            .phishtank_base(server.uri());

        let outcome = checker.score(&target()).await;
        let metric = &outcome.metrics[0];
        assert_eq!(metric.status, MetricStatus::Success);
        assert!((metric.score - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn listing_drags_score_down() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v4/threatMatches:find"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [{ "threatType": "MALWARE" }]
            })))
            .mount(&server)
            .await;
        mock_urlhaus(&server, "no_results").await;
        mock_phishtank(&server, false).await;

        let checker = MalwareChecker::new(creds(true), Duration::from_secs(5))
            .unwrap()
            .safe_browsing_base(server.uri())
            .urlhaus_base(server.uri())
            .phishtank_base(server.uri());

        let outcome = checker.score(&target()).await;
        let metric = &outcome.metrics[0];
        assert_eq!(metric.status, MetricStatus::Warning);
        // 1 listed + 2 clean -> 2/3
        assert!((metric.score - 2.0 / 3.0).abs() < 1e-12);
        assert!(metric.message.contains("safe_browsing"));
        assert!(!outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn missing_key_skips_safe_browsing_without_error() {
        let server = MockServer::start().await;
        mock_urlhaus(&server, "no_results").await;
        mock_phishtank(&server, false).await;

        let checker = MalwareChecker::new(creds(false), Duration::from_secs(5))
            .unwrap()
            .safe_browsing_base(server.uri())
            .urlhaus_base(server.uri())
            .phishtank_base(server.uri());

        let outcome = checker.score(&target()).await;
        let metric = &outcome.metrics[0];
        assert_eq!(metric.status, MetricStatus::Success);
        assert!((metric.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(metric.details["safe_browsing"], "skipped");
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn all_feeds_unavailable_is_skipped_neutral() {
        let checker = MalwareChecker::new(creds(false), Duration::from_secs(1))
            .unwrap()
            .urlhaus_base("http://127.0.0.1:1")
            .phishtank_base("http://127.0.0.1:1");

        let outcome = checker.score(&target()).await;
        let metric = &outcome.metrics[0];
        assert_eq!(metric.status, MetricStatus::Skipped);
        assert!((metric.score - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn failed_feed_is_recorded_as_warning() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/host/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        mock_phishtank(&server, false).await;

        let checker = MalwareChecker::new(creds(false), Duration::from_secs(5))
            .unwrap()
            .urlhaus_base(server.uri())
            .phishtank_base(server.uri());

        let outcome = checker.score(&target()).await;
        let metric = &outcome.metrics[0];
        // PhishTank alone answered, and answered clean.
        assert_eq!(metric.status, MetricStatus::Success);
        assert!((metric.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(metric.details["urlhaus"], "failed");
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("urlhaus check failed")));
    }

    #[tokio::test]
    async fn urlhaus_listed_verdict() {
        let server = MockServer::start().await;
        mock_urlhaus(&server, "ok").await;
        mock_phishtank(&server, false).await;

        let checker = MalwareChecker::new(creds(false), Duration::from_secs(5))
            .unwrap()
            .urlhaus_base(server.uri())
            .phishtank_base(server.uri());

        let outcome = checker.score(&target()).await;
        let metric = &outcome.metrics[0];
        assert_eq!(metric.status, MetricStatus::Warning);
        assert!((metric.score - 0.5).abs() < f64::EPSILON);
        assert_eq!(metric.details["urlhaus"], "listed");
    }
}
