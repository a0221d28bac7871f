//! Relative uplift of a treatment arm over a control arm
//!
//! The uplift distribution is built pairwise from posterior draws:
//! `(treatment[i] - control[i]) / control[i]` for every index both arms share.
//! A zero baseline never produces `NaN` or an infinity; the ratio is defined
//! as 0 instead.
//!
//! # Verdict
//!
//! A treatment is called only when the credible interval excludes zero AND the
//! win probability corroborates it:
//!
//! - `ci_low > 0` and `win_probability > 0.95` → [`Verdict::Won`]
//! - `ci_high < 0` and `win_probability < 0.05` → [`Verdict::Lost`]
//! - anything else → [`Verdict::NotSignificant`]
//!
//! Both bounds are exclusive.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::quantile::{central_interval_sorted, sorted_copy};

/// One arm of an experiment: its point estimate and its posterior draws
#[derive(Debug, Clone, Copy)]
pub struct PosteriorArm<'a> {
    /// Point estimate of the metric
    pub mean: f64,
    /// Posterior draws of the metric
    pub samples: &'a [f64],
}

impl<'a> PosteriorArm<'a> {
    pub fn new(mean: f64, samples: &'a [f64]) -> Self {
        Self { mean, samples }
    }
}

/// Significance call for a treatment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Won,
    Lost,
    NotSignificant,
}

impl Verdict {
    /// Classify an interval and win probability against `thresholds`
    pub fn classify(
        ci_low: f64,
        ci_high: f64,
        win_probability: f64,
        thresholds: &UpliftThresholds,
    ) -> Self {
        if ci_low > 0.0 && win_probability > thresholds.win_above {
            Verdict::Won
        } else if ci_high < 0.0 && win_probability < thresholds.lose_below {
            Verdict::Lost
        } else {
            Verdict::NotSignificant
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Won => "Won",
            Verdict::Lost => "Lost",
            Verdict::NotSignificant => "Not significant",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity bucket for the probability of a loss
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Loss probability at most 1%
    Low,
    /// Loss probability above 1% and at most 5%
    Medium,
    /// Loss probability above 5%
    High,
}

impl RiskLevel {
    pub fn from_probability(risk_probability: f64) -> Self {
        let pct = risk_probability * 100.0;
        if pct > 5.0 {
            RiskLevel::High
        } else if pct > 1.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Interval level and decision thresholds for the verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
#[serde(default)]
pub struct UpliftThresholds {
    /// Central credible interval mass (0.95 reads the 2.5th/97.5th percentiles)
    pub credible_level: f64,
    /// Win probability a treatment must exceed to be called a win
    pub win_above: f64,
    /// Win probability a treatment must fall under to be called a loss
    pub lose_below: f64,
}

impl Default for UpliftThresholds {
    fn default() -> Self {
        Self {
            credible_level: 0.95,
            win_above: 0.95,
            lose_below: 0.05,
        }
    }
}

/// Summary statistics of a treatment-vs-control uplift distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct UpliftSummary {
    /// Relative change of the treatment mean over the control mean
    pub mean_uplift: f64,
    /// Lower bound of the credible interval
    pub ci_low: f64,
    /// Upper bound of the credible interval
    pub ci_high: f64,
    /// Fraction of uplift draws above zero
    pub win_probability: f64,
    /// Fraction of uplift draws below zero
    pub risk_probability: f64,
    /// Expected absolute loss, `risk_probability * |treatment.mean - control.mean|`,
    /// rounded to 4 decimals
    pub risk_magnitude: f64,
    /// Significance call
    pub verdict: Verdict,
}

impl UpliftSummary {
    /// Width of the credible interval
    pub fn interval_width(&self) -> f64 {
        (self.ci_high - self.ci_low).abs()
    }

    /// Whether the credible interval lies strictly on both sides of zero
    pub fn straddles_zero(&self) -> bool {
        self.ci_low < 0.0 && self.ci_high > 0.0
    }

    /// Severity bucket of `risk_probability`
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_probability(self.risk_probability)
    }
}

/// Uplift summary together with the draws it was computed from
///
/// `summary` is `None` when either arm has no posterior draws; that is the
/// "no data" outcome, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpliftAnalysis {
    pub summary: Option<UpliftSummary>,
    pub samples: Vec<f64>,
}

impl UpliftAnalysis {
    /// The "no data" outcome
    pub fn no_data() -> Self {
        Self::default()
    }

    pub fn has_data(&self) -> bool {
        self.summary.is_some()
    }
}

/// Relative change of `value` over `base`, 0 when `base` is 0
pub fn relative_change(base: f64, value: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (value - base) / base
    }
}

/// Pairwise relative uplift draws
///
/// The result has `min(control.len(), treatment.len())` elements.
pub fn uplift_samples(control: &[f64], treatment: &[f64]) -> Vec<f64> {
    control
        .iter()
        .zip(treatment)
        .map(|(&c, &t)| relative_change(c, t))
        .collect()
}

/// Analyze a treatment arm against a control arm with default thresholds
pub fn analyze_uplift(control: PosteriorArm<'_>, treatment: PosteriorArm<'_>) -> UpliftAnalysis {
    analyze_uplift_with(control, treatment, &UpliftThresholds::default())
}

/// Analyze a treatment arm against a control arm
pub fn analyze_uplift_with(
    control: PosteriorArm<'_>,
    treatment: PosteriorArm<'_>,
    thresholds: &UpliftThresholds,
) -> UpliftAnalysis {
    let samples = uplift_samples(control.samples, treatment.samples);
    let n = samples.len();
    if n == 0 {
        tracing::debug!(
            control = control.samples.len(),
            treatment = treatment.samples.len(),
            "no paired posterior draws, returning empty uplift"
        );
        return UpliftAnalysis::no_data();
    }

    let sorted = sorted_copy(&samples);
    let Some((ci_low, ci_high)) = central_interval_sorted(&sorted, thresholds.credible_level)
    else {
        return UpliftAnalysis::no_data();
    };

    let wins = samples.iter().filter(|&&u| u > 0.0).count();
    let losses = samples.iter().filter(|&&u| u < 0.0).count();
    let win_probability = wins as f64 / n as f64;
    let risk_probability = losses as f64 / n as f64;

    let mean_diff = (treatment.mean - control.mean).abs();
    let risk_magnitude = round_to(risk_probability * mean_diff, 4);

    let summary = UpliftSummary {
        mean_uplift: relative_change(control.mean, treatment.mean),
        ci_low,
        ci_high,
        win_probability,
        risk_probability,
        risk_magnitude,
        verdict: Verdict::classify(ci_low, ci_high, win_probability, thresholds),
    };

    UpliftAnalysis {
        summary: Some(summary),
        samples,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
