//! Security category: TLS deployment, response headers, threat feeds.

mod headers;
mod malware;
mod ssl_tls;

pub use headers::SecurityHeadersAnalyzer;
pub use malware::MalwareChecker;
pub use ssl_tls::SslTlsValidator;

use aihint_core::{Result, ScoringConfig};

use crate::group::{MetricsGroup, WeightedScorer};
use crate::probe::HttpProbe;
use crate::tls::TlsInspector;

/// Build the security group with its fixed internal weights.
pub fn group(config: &ScoringConfig) -> Result<MetricsGroup> {
    let timeout = config.scorer_timeout();
    let probe = HttpProbe::new(timeout)?;
    let tls = TlsInspector::new()?;

    Ok(MetricsGroup::new(
        "security",
        vec![
            WeightedScorer::new(SslTlsValidator::new(tls, probe.clone()), 0.40)
                .enabled(config.scorers.ssl_tls),
            WeightedScorer::new(SecurityHeadersAnalyzer::new(probe), 0.35)
                .enabled(config.scorers.security_headers),
            WeightedScorer::new(
                MalwareChecker::new(config.credentials.clone(), timeout)?,
                0.25,
            )
            .enabled(config.scorers.malware),
        ],
    ))
}
