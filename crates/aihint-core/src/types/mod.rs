//! Strongly-typed data model for trust scoring.

mod config;
mod level;
mod metric;
mod result;

pub use config::{ApiCredentials, CategoryWeights, ScorerToggles, ScoringConfig};
pub use level::TrustLevel;
pub use metric::{MetricResult, MetricStatus};
pub use result::{ResultParts, ScoringResult, SCORING_METHOD};
