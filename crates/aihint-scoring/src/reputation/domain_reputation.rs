//! Domain reputation: registration record, blocklists, DNS posture.

use std::time::Instant;

use aihint_core::MetricResult;
use async_trait::async_trait;
use serde_json::json;

use crate::dns::{BlacklistHit, DnsInspector, DnsPosture, DEFAULT_BLOCKLIST_ZONES};
use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};
use crate::whois::{WhoisClient, WhoisInfo};

const WHOIS_WEIGHT: f64 = 0.4;
const BLACKLIST_WEIGHT: f64 = 0.3;
const DNS_WEIGHT: f64 = 0.3;

/// Weighs three reputation signals: the WHOIS registration record, domain
/// blocklist listings, and general DNS hygiene.
///
/// A sub-check whose lookup fails contributes a neutral 0.5 instead of
/// dragging the score to zero.
pub struct DomainReputationChecker {
    whois: WhoisClient,
    dns: DnsInspector,
}

impl DomainReputationChecker {
    /// Checker over shared WHOIS and DNS clients.
    #[must_use]
    pub fn new(whois: WhoisClient, dns: DnsInspector) -> Self {
        Self { whois, dns }
    }
}

#[async_trait]
impl Scorer for DomainReputationChecker {
    fn name(&self) -> &'static str {
        "domain_reputation"
    }

    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome {
        let start = Instant::now();

        let (whois_result, posture_result, hits) = tokio::join!(
            self.whois.lookup(&target.host),
            self.dns.posture(&target.host),
            self.dns.blacklist_check(&target.host, DEFAULT_BLOCKLIST_ZONES),
        );

        let mut warnings = Vec::new();

        let whois_score = match &whois_result {
            Ok(info) => whois_reputation_score(info),
            Err(e) => {
                warnings.push(format!("domain_reputation: WHOIS unavailable: {e}"));
                0.5
            }
        };

        let blacklist = blacklist_score(&hits);
        for hit in &hits {
            warnings.push(format!(
                "domain_reputation: {} listed on {}",
                target.host, hit.zone
            ));
        }

        let dns_score = match &posture_result {
            Ok(posture) => dns_posture_score(posture),
            Err(e) => {
                warnings.push(format!("domain_reputation: DNS unavailable: {e}"));
                0.5
            }
        };

        let score = whois_score * WHOIS_WEIGHT
            + blacklist * BLACKLIST_WEIGHT
            + dns_score * DNS_WEIGHT;

        let details = json!({
            "whois_reputation": {
                "score": whois_score,
                "weight": WHOIS_WEIGHT,
                "age_days": whois_result.as_ref().ok().and_then(WhoisInfo::age_days),
            },
            "blacklists": {
                "score": blacklist,
                "weight": BLACKLIST_WEIGHT,
                "listings": hits.iter().map(|h| h.zone.clone()).collect::<Vec<_>>(),
            },
            "dns_reputation": {
                "score": dns_score,
                "weight": DNS_WEIGHT,
            },
        });

        let mut out = ScorerOutcome::from_metric(MetricResult::success(
            self.name(),
            score,
            format!("domain reputation scored {score:.2}"),
            details,
            elapsed_ms(start),
        ));
        out.warnings = warnings;
        out
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Start from full trust and deduct for youth and imminent expiry.
fn whois_reputation_score(info: &WhoisInfo) -> f64 {
    let mut score: f64 = 1.0;
    if let Some(age) = info.age_days() {
        if age < 30 {
            score -= 0.3;
        } else if age < 365 {
            score -= 0.1;
        }
    }
    if let Some(days) = info.days_to_expiry() {
        if days < 30 {
            score -= 0.2;
        }
    }
    score.max(0.0)
}

fn blacklist_score(hits: &[BlacklistHit]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let penalty = hits.len() as f64 * 0.3;
    (1.0 - penalty).max(0.0)
}

fn dns_posture_score(posture: &DnsPosture) -> f64 {
    let mut score: f64 = 1.0;
    if posture.addresses.is_empty() {
        score -= 0.3;
    } else {
        if posture.has_loopback_address() {
            score -= 0.5;
        }
        if posture.has_private_address() {
            score -= 0.2;
        }
    }
    if posture.mx_hosts.is_empty() {
        score -= 0.1;
    }
    if posture.ns_hosts.is_empty() {
        score -= 0.2;
    }
    if !posture.has_spf {
        score -= 0.1;
    }
    if !posture.has_dmarc {
        score -= 0.1;
    }
    score.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::net::{IpAddr, Ipv4Addr};

    fn whois_aged(age_days: i64, expiry_days: i64) -> WhoisInfo {
        WhoisInfo {
            creation_date: Some(Utc::now() - Duration::days(age_days)),
            expiration_date: Some(Utc::now() + Duration::days(expiry_days)),
            ..WhoisInfo::default()
        }
    }

    #[test]
    fn whois_deductions() {
        assert!((whois_reputation_score(&whois_aged(1000, 300)) - 1.0).abs() < f64::EPSILON);
        // < 30 days old
        assert!((whois_reputation_score(&whois_aged(10, 300)) - 0.7).abs() < 1e-12);
        // < 1 year old
        assert!((whois_reputation_score(&whois_aged(100, 300)) - 0.9).abs() < 1e-12);
        // young and expiring
        assert!((whois_reputation_score(&whois_aged(10, 10)) - 0.5).abs() < 1e-12);
        // unknown dates: no deductions
        assert!((whois_reputation_score(&WhoisInfo::default()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn blacklist_deductions_floor_at_zero() {
        let hit = |zone: &str| BlacklistHit {
            zone: zone.to_string(),
            responses: vec![IpAddr::V4(Ipv4Addr::new(127, 0, 0, 2))],
        };
        assert!((blacklist_score(&[]) - 1.0).abs() < f64::EPSILON);
        assert!((blacklist_score(&[hit("a")]) - 0.7).abs() < 1e-12);
        let many = vec![hit("a"), hit("b"), hit("c"), hit("d")];
        assert!(blacklist_score(&many).abs() < f64::EPSILON);
    }

    #[test]
    fn dns_posture_healthy_is_full_marks() {
        let posture = DnsPosture {
            addresses: vec![IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))],
            mx_hosts: vec!["mx.example.com.".to_string()],
            ns_hosts: vec!["ns.example.com.".to_string()],
            has_spf: true,
            has_dmarc: true,
        };
        assert!((dns_posture_score(&posture) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dns_posture_deductions_stack() {
        // No records at all: -0.3 A, -0.1 MX, -0.2 NS, -0.1 SPF, -0.1 DMARC
        let empty = DnsPosture::default();
        assert!((dns_posture_score(&empty) - 0.2).abs() < 1e-12);

        let loopback = DnsPosture {
            addresses: vec![IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))],
            mx_hosts: vec!["mx".to_string()],
            ns_hosts: vec!["ns".to_string()],
            has_spf: true,
            has_dmarc: true,
        };
        assert!((dns_posture_score(&loopback) - 0.5).abs() < 1e-12);
    }
}
