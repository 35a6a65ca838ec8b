//! Incident heuristics over the domain name itself.
//!
//! Pure string analysis, no network: malicious naming patterns,
//! throwaway/test naming, and typosquats of major brands.

use std::time::Instant;

use aihint_core::MetricResult;
use async_trait::async_trait;
use serde_json::json;

use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};

const MALWARE_KEYWORDS: &[&str] = &["malware", "virus", "trojan", "spyware"];
const PHISHING_KEYWORDS: &[&str] = &["phish", "fake", "scam", "fraud"];
const REGULATORY_KEYWORDS: &[&str] = &["unregulated", "illegal", "banned"];
const TEST_KEYWORDS: &[&str] = &["test", "demo", "example", "staging"];

/// Brands commonly impersonated by lookalike registrations.
const MAJOR_BRANDS: &[&str] = &[
    "google",
    "facebook",
    "amazon",
    "apple",
    "microsoft",
    "paypal",
    "netflix",
    "instagram",
    "linkedin",
    "github",
    "youtube",
    "whatsapp",
    "ebay",
    "adobe",
    "twitter",
];

/// Scores incident risk from naming heuristics: domains whose names
/// advertise malicious intent, throwaway/test domains, and one-edit or
/// hyphen-embedded brand lookalikes.
pub struct IncidentTracker;

impl IncidentTracker {
    /// Stateless tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for IncidentTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scorer for IncidentTracker {
    fn name(&self) -> &'static str {
        "incidents"
    }

    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome {
        let start = Instant::now();
        let host = target.host.as_str();

        let mut incidents = Vec::new();

        let malware = keyword_check(host, MALWARE_KEYWORDS, 0.0, "name suggests malware", &mut incidents);
        let phishing = keyword_check(host, PHISHING_KEYWORDS, 0.0, "name suggests phishing", &mut incidents);
        let regulatory = keyword_check(host, REGULATORY_KEYWORDS, 0.0, "name suggests regulatory issues", &mut incidents);
        let breaches = keyword_check(host, TEST_KEYWORDS, 0.8, "test or demo domain", &mut incidents);

        let typosquat = match typosquat_of(host) {
            Some(brand) => {
                incidents.push(format!("possible typosquat of {brand}"));
                0.0
            }
            None => 1.0,
        };

        let score = (malware + phishing + regulatory + breaches + typosquat) / 5.0;

        let details = json!({
            "malware_history": malware,
            "phishing_incidents": phishing,
            "regulatory_violations": regulatory,
            "data_breaches": breaches,
            "typosquat": typosquat,
            "incidents": incidents,
        });

        let message = if incidents.is_empty() {
            "no incident indicators found".to_string()
        } else {
            format!("{} incident indicators found", incidents.len())
        };

        let mut out = ScorerOutcome::from_metric(MetricResult::success(
            self.name(),
            score,
            message,
            details,
            elapsed_ms(start),
        ));
        out.warnings = incidents
            .into_iter()
            .map(|i| format!("incidents: {i}"))
            .collect();
        out
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn keyword_check(
    host: &str,
    keywords: &[&str],
    hit_score: f64,
    description: &str,
    incidents: &mut Vec<String>,
) -> f64 {
    if keywords.iter().any(|k| host.contains(k)) {
        incidents.push(description.to_string());
        hit_score
    } else {
        1.0
    }
}

/// Detect brand lookalikes in the registrable label: either one edit away
/// from a brand name, or the brand embedded among hyphenated segments
/// (`paypal-login.example`). The brand's own domain is not a squat.
fn typosquat_of(host: &str) -> Option<&'static str> {
    let label = host.split('.').next()?;

    for brand in MAJOR_BRANDS {
        if label == *brand {
            return None;
        }
        if label.contains('-') && label.split('-').any(|seg| seg == *brand) {
            return Some(brand);
        }
        if one_edit_apart(label, brand) {
            return Some(brand);
        }
    }
    None
}

/// True when `a` and `b` differ by exactly one insertion, deletion, or
/// substitution.
fn one_edit_apart(a: &str, b: &str) -> bool {
    let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
    let (short, long) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    match long.len() - short.len() {
        0 => {
            let diffs = short.iter().zip(long.iter()).filter(|(x, y)| x != y).count();
            diffs == 1
        }
        1 => {
            let mut i = 0;
            let mut j = 0;
            let mut skipped = false;
            while i < short.len() && j < long.len() {
                if short[i] == long[j] {
                    i += 1;
                    j += 1;
                } else if skipped {
                    return false;
                } else {
                    skipped = true;
                    j += 1;
                }
            }
            true
        }
        _ => false,
    }
}
