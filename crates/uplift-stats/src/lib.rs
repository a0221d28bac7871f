//! uplift-stats - Statistical primitives for Bayesian A/B-test uplift analysis
//!
//! This crate provides the numeric core used to compare a treatment group
//! against a control group from paired posterior samples:
//!
//! - **Quantile**: interpolated order statistics over sample sets
//! - **Summary**: mean and spread of a sample set
//! - **Uplift**: relative-uplift samples, credible interval, win/risk probability and verdict
//! - **KDE**: Gaussian kernel density estimation for violin silhouettes
//! - **Sampling**: seeded Gaussian draws for summaries that carry no posterior samples
//!
//! Every function here is pure. Degenerate inputs (empty sample sets, zero
//! baselines, zero spread) are handled with documented sentinels rather than
//! errors, so callers can branch on the presence of values.

pub mod error;
pub mod kde;
pub mod quantile;
pub mod sampling;
pub mod summary;
pub mod uplift;

pub use error::*;
pub use kde::*;
pub use quantile::*;
pub use sampling::*;
pub use summary::*;
pub use uplift::*;

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
