//! uplift-core - Comparison engine for Bayesian A/B-test results
//!
//! Turns per-group posterior payloads into renderable comparison records:
//! one record per treatment group, each carrying the uplift summary, a
//! density curve, percentage ticks, and violin geometry in abstract pixel
//! space.
//!
//! # Key Components
//!
//! - **Group / Payload**: strict group model and normalization of loosely-typed JSON payloads
//! - **Compare**: baseline selection and per-treatment record assembly, optionally per cohort
//! - **Axis**: human-readable percentage tick selection and the horizontal pixel scale
//! - **Violin**: loss/gain lobes split at zero uplift, mean marker, tick guides
//! - **Trend**: merge of per-cohort time series into one chart series set
//! - **Config**: thresholds, grid sizes, geometry, cohort palette, metric catalog
//!
//! Nothing here performs I/O or holds state between calls; every entry point
//! is a pure function of its inputs.

pub mod axis;
pub mod compare;
pub mod config;
pub mod error;
pub mod group;
pub mod payload;
pub mod trend;
pub mod types;
pub mod violin;

pub use axis::*;
pub use compare::*;
pub use config::*;
pub use error::*;
pub use group::*;
pub use payload::*;
pub use trend::*;
pub use types::*;
pub use violin::*;

pub use uplift_stats::{DensityCurve, RiskLevel, UpliftSummary, UpliftThresholds, Verdict};

// Setup UniFFI when the feature is enabled
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
