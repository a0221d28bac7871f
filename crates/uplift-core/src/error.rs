//! Error types for uplift-core
//!
//! Statistical edge cases (missing draws, zero baselines, zero spread) are NOT
//! errors; they surface as absent fields on the comparison records. The
//! errors here cover contract violations only:
//! - Malformed payloads from the data source
//! - Invalid engine configuration

use thiserror::Error;
use uplift_stats::StatsError;

/// Main error type for uplift-core operations
#[derive(Error, Debug)]
pub enum UpliftError {
    /// Payload parsing errors
    #[error("Invalid payload: {0}")]
    Payload(#[from] PayloadError),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Estimator contract errors
    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),
}

/// Errors related to group payloads
#[derive(Error, Debug)]
pub enum PayloadError {
    /// Document is not valid JSON
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Document has an unsupported top-level shape
    #[error("Unexpected payload shape: expected {expected}, got {actual}")]
    UnexpectedShape {
        expected: &'static str,
        actual: String,
    },

    /// A group object violates the group schema
    #[error("Invalid group at {location}: {source}")]
    InvalidGroup {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors related to configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Threshold values are invalid relative to each other
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Configuration text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for uplift-core operations
pub type UpliftResult<T> = Result<T, UpliftError>;

/// Result type alias for payload operations
pub type PayloadResult<T> = Result<T, PayloadError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
