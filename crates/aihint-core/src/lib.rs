//! Core types for the aihint trust scoring engine.
//!
//! This crate provides the foundational types shared across the aihint
//! workspace:
//!
//! - **Metrics**: [`MetricResult`] and [`MetricStatus`], the atomic outcome
//!   of a single check
//! - **Classification**: [`TrustLevel`], the discrete band derived from a
//!   final score
//! - **Results**: [`ScoringResult`], the immutable output of one scoring run
//! - **Configuration**: [`ScoringConfig`], read-only for the duration of a
//!   call and safely shared across concurrent calls
//! - **Errors**: [`ScoreError`] for the fallible internals of individual
//!   checks
//!
//! # Example
//!
//! ```rust
//! use aihint_core::TrustLevel;
//!
//! assert_eq!(TrustLevel::from_score(0.95), TrustLevel::High);
//! assert_eq!(TrustLevel::from_score(0.42), TrustLevel::Low);
//! ```

mod error;
pub mod types;

pub use error::{Result, ScoreError};
pub use types::*;
