//! Summary statistics for posterior sample sets
//!
//! Spread is reported as the population standard deviation (divide by `n`),
//! which is what the KDE bandwidth rule is calibrated against.

use serde::{Deserialize, Serialize};

use crate::quantile::{quantile_sorted, sorted_copy};

/// Location and spread of a sample set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct SampleSummary {
    /// Number of finite values
    pub count: u64,
    /// Number of non-finite values that were skipped
    pub missing: u64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Interpolated median
    pub median: f64,
}

impl SampleSummary {
    /// Compute the summary of `data`, skipping non-finite values
    ///
    /// Returns `None` when no finite value is present.
    pub fn from_data(data: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }

        let missing = (data.len() - finite.len()) as u64;
        let mean = mean(&finite);
        let std_dev = population_std_dev(&finite, mean);

        let sorted = sorted_copy(&finite);
        let median = quantile_sorted(&sorted, 0.5)?;

        Some(Self {
            count: finite.len() as u64,
            missing,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            std_dev,
            median,
        })
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Whether every value is identical
    pub fn is_constant(&self) -> bool {
        self.std_dev == 0.0
    }
}

/// Arithmetic mean; 0 for an empty slice
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation around a precomputed `mean`
pub fn population_std_dev(data: &[f64], mean: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}
