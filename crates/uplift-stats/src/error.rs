//! Error types for uplift-stats

use thiserror::Error;

/// Errors raised when an estimator is invoked outside its contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Not enough samples for the requested estimator
    #[error("Insufficient samples: {required} required, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    /// Bandwidth must be finite and strictly positive
    #[error("Invalid bandwidth: {bandwidth}")]
    InvalidBandwidth { bandwidth: f64 },

    /// Evaluation grid needs at least two points
    #[error("Invalid grid size: {points} points (minimum 2)")]
    InvalidGrid { points: usize },
}

/// Result type alias for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;
