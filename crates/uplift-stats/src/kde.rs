//! Gaussian kernel density estimation
//!
//! Produces the smoothed density curve drawn as a violin silhouette. A single
//! global bandwidth is used, derived from the sample spread:
//! `h = 0.4 * std(samples)`, falling back to `1e-6` for constant samples.
//!
//! # Endpoint convention
//!
//! [`DensityCurve::estimate`] forces the first and last density value to 0 so
//! the rendered outline closes on the center line. This is purely cosmetic:
//! the endpoints of the returned curve are NOT density estimates and must not
//! be used for inference. Use [`GaussianKde::evaluate`] for raw values.

use std::f64::consts::PI;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};
use crate::summary::{mean, population_std_dev};

/// Multiplier applied to the sample standard deviation
pub const DEFAULT_BANDWIDTH_FACTOR: f64 = 0.4;

/// Bandwidth used when the samples have no spread
pub const BANDWIDTH_EPSILON: f64 = 1e-6;

/// Standard normal kernel, `exp(-u^2 / 2) / sqrt(2 pi)`
#[inline]
pub fn gaussian_kernel(u: f64) -> f64 {
    (-0.5 * u * u).exp() / (2.0 * PI).sqrt()
}

/// Bandwidth for `samples`: `factor * std`, or [`BANDWIDTH_EPSILON`] when that is 0
pub fn bandwidth_for(samples: &[f64], factor: f64) -> f64 {
    let std = population_std_dev(samples, mean(samples));
    let h = std * factor;
    if h > 0.0 && h.is_finite() {
        h
    } else {
        BANDWIDTH_EPSILON
    }
}

/// `n` evenly spaced points from `lo` to `hi` inclusive
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let span = hi - lo;
            let last = (n - 1) as f64;
            (0..n).map(|i| lo + span * i as f64 / last).collect()
        }
    }
}

/// A Gaussian KDE over a fixed sample set
#[derive(Debug, Clone)]
pub struct GaussianKde<'a> {
    samples: &'a [f64],
    bandwidth: f64,
}

impl<'a> GaussianKde<'a> {
    /// Build an estimator with the default bandwidth rule
    ///
    /// Requires at least two samples.
    pub fn new(samples: &'a [f64]) -> StatsResult<Self> {
        Self::with_factor(samples, DEFAULT_BANDWIDTH_FACTOR)
    }

    /// Build an estimator with `factor * std` as the bandwidth
    pub fn with_factor(samples: &'a [f64], factor: f64) -> StatsResult<Self> {
        check_samples(samples)?;
        Ok(Self {
            samples,
            bandwidth: bandwidth_for(samples, factor),
        })
    }

    /// Build an estimator with an explicit bandwidth
    pub fn with_bandwidth(samples: &'a [f64], bandwidth: f64) -> StatsResult<Self> {
        check_samples(samples)?;
        if !(bandwidth > 0.0 && bandwidth.is_finite()) {
            return Err(StatsError::InvalidBandwidth { bandwidth });
        }
        Ok(Self { samples, bandwidth })
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Estimated density at `x`
    ///
    /// Time complexity: O(n)
    pub fn evaluate(&self, x: f64) -> f64 {
        let h = self.bandwidth;
        let sum: f64 = self
            .samples
            .iter()
            .map(|&s| gaussian_kernel((x - s) / h))
            .sum();
        sum / (self.samples.len() as f64 * h)
    }

    /// Estimated density at every point of `xs`
    ///
    /// Time complexity: O(n * xs.len())
    pub fn evaluate_grid(&self, xs: &[f64]) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        let density: Vec<f64> = xs.par_iter().map(|&x| self.evaluate(x)).collect();

        #[cfg(not(feature = "parallel"))]
        let density: Vec<f64> = xs.iter().map(|&x| self.evaluate(x)).collect();

        density
    }
}

fn check_samples(samples: &[f64]) -> StatsResult<()> {
    if samples.len() < 2 {
        return Err(StatsError::InsufficientSamples {
            required: 2,
            actual: samples.len(),
        });
    }
    Ok(())
}

/// Density curve ready for violin rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct DensityCurve {
    /// Evaluation points, ascending
    pub xs: Vec<f64>,
    /// Density at each point; first and last forced to 0
    pub density: Vec<f64>,
    /// Bandwidth the curve was estimated with
    pub bandwidth: f64,
}

impl DensityCurve {
    /// Estimate the density of `samples` on `xs`
    ///
    /// `bandwidth` overrides the default `0.4 * std` rule when given.
    pub fn estimate(samples: &[f64], xs: &[f64], bandwidth: Option<f64>) -> StatsResult<Self> {
        let kde = match bandwidth {
            Some(h) => GaussianKde::with_bandwidth(samples, h)?,
            None => GaussianKde::new(samples)?,
        };
        Ok(Self::from_kde(&kde, xs))
    }

    /// Estimate on an evenly spaced grid of `points` spanning `[lo, hi]`
    pub fn estimate_on_range(
        samples: &[f64],
        lo: f64,
        hi: f64,
        points: usize,
        bandwidth_factor: f64,
    ) -> StatsResult<Self> {
        if points < 2 {
            return Err(StatsError::InvalidGrid { points });
        }
        let kde = GaussianKde::with_factor(samples, bandwidth_factor)?;
        Ok(Self::from_kde(&kde, &linspace(lo, hi, points)))
    }

    fn from_kde(kde: &GaussianKde<'_>, xs: &[f64]) -> Self {
        let mut density = kde.evaluate_grid(xs);
        close_endpoints(&mut density);
        Self {
            xs: xs.to_vec(),
            density,
            bandwidth: kde.bandwidth(),
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Largest density value, 0 for an empty curve
    pub fn max_density(&self) -> f64 {
        self.density.iter().copied().fold(0.0, f64::max)
    }

    /// `(x, density)` pairs
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.xs.iter().copied().zip(self.density.iter().copied()).collect()
    }
}

// Cosmetic: closes the silhouette on its center line.
fn close_endpoints(density: &mut [f64]) {
    if let Some(first) = density.first_mut() {
        *first = 0.0;
    }
    if let Some(last) = density.last_mut() {
        *last = 0.0;
    }
}
