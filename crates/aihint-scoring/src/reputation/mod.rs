//! Reputation category: registration record, blocklists, naming heuristics.

mod domain_age;
mod domain_reputation;
mod incidents;

pub use domain_age::DomainAgeAnalyzer;
pub use domain_reputation::DomainReputationChecker;
pub use incidents::IncidentTracker;

use aihint_core::{Result, ScoringConfig};

use crate::dns::DnsInspector;
use crate::group::{MetricsGroup, WeightedScorer};
use crate::whois::WhoisClient;

/// Build the reputation group with its fixed internal weights.
pub fn group(config: &ScoringConfig) -> Result<MetricsGroup> {
    let whois = WhoisClient::new()?;

    Ok(MetricsGroup::new(
        "reputation",
        vec![
            WeightedScorer::new(
                DomainReputationChecker::new(whois.clone(), DnsInspector::new()),
                0.40,
            )
            .enabled(config.scorers.domain_reputation),
            WeightedScorer::new(DomainAgeAnalyzer::new(whois), 0.30)
                .enabled(config.scorers.domain_age),
            WeightedScorer::new(IncidentTracker::new(), 0.30)
                .enabled(config.scorers.incidents),
        ],
    ))
}
