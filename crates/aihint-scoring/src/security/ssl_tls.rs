//! SSL/TLS configuration scoring.

use std::time::Instant;

use aihint_core::MetricResult;
use async_trait::async_trait;
use serde_json::json;

use crate::probe::HttpProbe;
use crate::scorer::{ScoreTarget, Scorer, ScorerOutcome};
use crate::security::headers::hsts_directive_score;
use crate::tls::{TlsInspector, TlsObservation};

/// Scores the target's TLS deployment from a live handshake: certificate
/// validity window, negotiated protocol and cipher, chain shape, and the
/// HSTS policy served alongside it.
pub struct SslTlsValidator {
    tls: TlsInspector,
    probe: HttpProbe,
}

impl SslTlsValidator {
    /// Validator over the shared inspector and probe.
    #[must_use]
    pub fn new(tls: TlsInspector, probe: HttpProbe) -> Self {
        Self { tls, probe }
    }
}

#[async_trait]
impl Scorer for SslTlsValidator {
    fn name(&self) -> &'static str {
        "ssl_tls"
    }

    async fn score(&self, target: &ScoreTarget) -> ScorerOutcome {
        let start = Instant::now();

        // A plain-HTTP site has no TLS to inspect. That is a measurement,
        // not a failure.
        if !target.is_https() {
            return ScorerOutcome::from_metric(MetricResult::warning(
                self.name(),
                0.0,
                "site does not use HTTPS",
                json!({ "scheme": target.scheme }),
                elapsed_ms(start),
            ))
            .with_warning("site does not use HTTPS");
        }

        let obs = match self.tls.observe(&target.host).await {
            Ok(obs) => obs,
            Err(e) => {
                return ScorerOutcome::from_metric(MetricResult::error(
                    self.name(),
                    format!("TLS handshake failed: {e}"),
                    elapsed_ms(start),
                ))
                .with_error(format!("ssl_tls: {e}"));
            }
        };

        let validity = validity_score(obs.days_to_expiry());
        let protocol = protocol_score(&obs.protocol);
        let cipher = cipher_score(obs.cipher_bits);
        let chain = chain_score(&obs);

        // HSTS is served over HTTP, not in the handshake; best effort.
        let mut outcome_warnings = Vec::new();
        let hsts = match self.probe.fetch_homepage(target).await {
            Ok(page) => page
                .header("strict-transport-security")
                .map_or(0.0, hsts_directive_score),
            Err(e) => {
                outcome_warnings.push(format!("ssl_tls: HSTS check unavailable: {e}"));
                0.0
            }
        };

        let score = (validity + protocol + cipher + chain + hsts) / 5.0;
        let details = json!({
            "certificate_validity": {
                "score": validity,
                "days_until_expiry": obs.days_to_expiry(),
                "not_after": obs.not_after.to_rfc3339(),
            },
            "protocol_version": { "score": protocol, "negotiated": obs.protocol },
            "cipher_strength": {
                "score": cipher,
                "suite": obs.cipher_suite,
                "key_bits": obs.cipher_bits,
            },
            "certificate_chain": {
                "score": chain,
                "chain_len": obs.chain_len,
                "issuer": obs.issuer,
                "subject": obs.subject,
            },
            "hsts": { "score": hsts },
        });

        let mut out = ScorerOutcome::from_metric(MetricResult::success(
            self.name(),
            score,
            format!("{} with {}", obs.protocol, obs.cipher_suite),
            details,
            elapsed_ms(start),
        ));
        out.warnings = outcome_warnings;
        out
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn validity_score(days_to_expiry: i64) -> f64 {
    if days_to_expiry > 90 {
        1.0
    } else if days_to_expiry > 30 {
        0.9
    } else if days_to_expiry > 0 {
        0.7
    } else {
        0.0
    }
}

fn protocol_score(protocol: &str) -> f64 {
    match protocol {
        "TLSv1.3" => 1.0,
        "TLSv1.2" => 0.85,
        "TLSv1.1" => 0.6,
        _ => 0.2,
    }
}

fn cipher_score(bits: u32) -> f64 {
    if bits >= 256 {
        1.0
    } else if bits >= 128 {
        0.9
    } else {
        0.3
    }
}

fn chain_score(obs: &TlsObservation) -> f64 {
    if obs.looks_self_signed() {
        0.7
    } else {
        1.0
    }
}
