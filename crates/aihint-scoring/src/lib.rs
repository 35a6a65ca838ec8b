//! Trust scoring engine for websites.
//!
//! Runs a fixed set of pluggable checks ("scorers") grouped into three
//! categories (Security, Reputation, Compliance), tolerates partial
//! failure in any individual check, and aggregates the outcomes into a
//! single weighted score, a confidence value, and a discrete trust level.
//!
//! The engine is total over any syntactically valid URL: it never returns
//! an error and never panics. Every failure mode below the URL parse —
//! timeouts, DNS errors, TLS failures, API quota, WHOIS outages — degrades
//! the responsible scorer toward zero and is recorded as text.
//!
//! # Example
//!
//! ```rust,ignore
//! use aihint_core::ScoringConfig;
//! use aihint_scoring::TrustScoringEngine;
//!
//! let engine = TrustScoringEngine::new(ScoringConfig::default())?;
//! let result = engine.score_website("https://example.com").await;
//! println!("{} -> {:.3} ({})", result.url, result.final_score, result.trust_level);
//! ```

pub mod compliance;
mod dns;
mod engine;
mod group;
mod probe;
pub mod reputation;
mod scorer;
pub mod security;
mod tls;
mod whois;

pub use dns::{BlacklistHit, DnsInspector, DnsPosture};
pub use engine::TrustScoringEngine;
pub use group::{GroupOutcome, MetricsGroup, WeightedScorer};
pub use probe::{FetchedPage, HttpProbe};
pub use scorer::{ScoreTarget, Scorer, ScorerOutcome};
pub use tls::{TlsInspector, TlsObservation};
pub use whois::{WhoisClient, WhoisInfo};
