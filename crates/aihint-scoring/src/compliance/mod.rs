//! Compliance category: privacy policy, contact channels, legal surface.

mod contact;
mod legal;
mod privacy_policy;

pub use contact::ContactValidator;
pub use legal::LegalComplianceChecker;
pub use privacy_policy::PrivacyPolicyAnalyzer;

use aihint_core::{Result, ScoringConfig};

use crate::group::{MetricsGroup, WeightedScorer};
use crate::probe::HttpProbe;

/// Build the compliance group with its fixed internal weights.
pub fn group(config: &ScoringConfig) -> Result<MetricsGroup> {
    let probe = HttpProbe::new(config.scorer_timeout())?;

    Ok(MetricsGroup::new(
        "compliance",
        vec![
            WeightedScorer::new(PrivacyPolicyAnalyzer::new(probe.clone()), 0.40)
                .enabled(config.scorers.privacy_policy),
            WeightedScorer::new(ContactValidator::new(probe.clone())?, 0.30)
                .enabled(config.scorers.contact),
            WeightedScorer::new(LegalComplianceChecker::new(probe), 0.30)
                .enabled(config.scorers.legal_compliance),
        ],
    ))
}
