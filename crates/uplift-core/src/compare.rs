//! Group comparison
//!
//! The group with the smallest identifier is the baseline; every other group
//! is compared against it. Each comparison runs the uplift statistics, the
//! density estimate over the credible interval, tick selection and violin
//! layout, and is assembled into one [`ComparisonRecord`].

use serde::{Deserialize, Serialize};
use uplift_stats::{
    analyze_uplift_with, central_interval_sorted, sorted_copy, std_from_interval,
    synthesize_gaussian, DensityCurve, SampleSummary, UpliftSummary,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::axis::{widened_percent_ticks, TickSet};
use crate::config::EngineConfig;
use crate::group::{split_baseline, ArmSummary, Group};
use crate::payload::{Cohort, ComparisonInput};
use crate::violin::{build_violin, ViolinGeometry};

/// Where the draws behind a density curve came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(rename_all = "snake_case")]
pub enum DensitySource {
    /// Pairwise uplift of the posterior draws
    Posterior,
    /// Gaussian draws reconstructed from the summary interval
    Synthesized,
    /// No curve could be drawn
    Unavailable,
}

/// One treatment compared against the baseline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ComparisonRecord {
    /// Stable key, `"{id}"` or `"{cohort}_{id}"`
    pub key: String,
    pub cohort: Option<String>,
    pub group_label: String,
    pub baseline: ArmSummary,
    pub treatment: ArmSummary,
    /// `None` when either arm has no posterior draws
    pub uplift: Option<UpliftSummary>,
    /// Spread of the pairwise uplift draws
    pub uplift_draws: Option<SampleSummary>,
    pub density: Option<DensityCurve>,
    pub ticks: Option<TickSet>,
    pub violin: Option<ViolinGeometry>,
    pub density_source: DensitySource,
}

impl ComparisonRecord {
    pub fn has_uplift(&self) -> bool {
        self.uplift.is_some()
    }
}

/// Compare one treatment against the baseline
pub fn compare_pair(
    baseline: &Group,
    treatment: &Group,
    cohort: Option<&str>,
    config: &EngineConfig,
) -> ComparisonRecord {
    let analysis = analyze_uplift_with(baseline.arm(), treatment.arm(), &config.uplift);
    let summary = analysis.summary;
    let uplift_draws = SampleSummary::from_data(&analysis.samples);

    let (density_source, density) = density_for(summary.as_ref(), &analysis.samples, config);

    let ticks = summary
        .as_ref()
        .map(|s| widened_percent_ticks(s.ci_low, s.ci_high))
        .filter(|t| {
            if t.len() < 2 {
                tracing::warn!(
                    treatment = %treatment.id,
                    "no usable tick range for the credible interval"
                );
            }
            !t.is_empty()
        });

    let violin = match (&density, &ticks, &summary) {
        (Some(curve), Some(ticks), Some(s)) => {
            build_violin(curve, s.mean_uplift, ticks, &config.violin)
        }
        _ => None,
    };

    let (key, group_label) = match cohort {
        Some(name) => (
            format!("{}_{}", name, treatment.id),
            format!("{} - {}", name.to_uppercase(), treatment.id),
        ),
        None => (treatment.id.to_string(), format!("Group {}", treatment.id)),
    };

    ComparisonRecord {
        key,
        cohort: cohort.map(str::to_string),
        group_label,
        baseline: baseline.summary(),
        treatment: treatment.summary(),
        uplift: summary,
        uplift_draws,
        density,
        ticks,
        violin,
        density_source,
    }
}

/// Density curve for a comparison, and the source of the draws behind it
///
/// With at least two posterior uplift draws the curve is estimated from them
/// over the credible interval of `summary`, which must describe the same
/// draws. Without draws, a summary with a positive-width interval is
/// expanded into seeded Gaussian draws; this serves callers that only hold a
/// precomputed summary, since [`compare_pair`] never has a summary without
/// draws. A degenerate interval yields no curve.
pub fn density_for(
    summary: Option<&UpliftSummary>,
    samples: &[f64],
    config: &EngineConfig,
) -> (DensitySource, Option<DensityCurve>) {
    let level = config.uplift.credible_level;
    let synthesized;

    let (source, draws, interval): (_, &[f64], _) = if samples.len() > 1 {
        let interval = match summary {
            Some(s) => Some((s.ci_low, s.ci_high)),
            None => central_interval_sorted(&sorted_copy(samples), level),
        };
        (DensitySource::Posterior, samples, interval)
    } else {
        match summary {
            Some(s) if s.interval_width() > 0.0 => {
                tracing::debug!(
                    draws = config.density.synthetic_draws,
                    "synthesizing uplift draws from summary interval"
                );
                let std = std_from_interval(s.ci_low, s.ci_high);
                synthesized = synthesize_gaussian(
                    s.mean_uplift,
                    std,
                    config.density.synthetic_draws,
                    config.density.synthetic_seed,
                );
                let interval = central_interval_sorted(&sorted_copy(&synthesized), level);
                (DensitySource::Synthesized, synthesized.as_slice(), interval)
            }
            _ => {
                tracing::debug!("no draws for density, skipping");
                return (DensitySource::Unavailable, None);
            }
        }
    };

    let Some((lo, hi)) = interval else {
        return (DensitySource::Unavailable, None);
    };
    if hi <= lo {
        tracing::debug!(lo, hi, "zero-width credible interval, skipping density");
        return (DensitySource::Unavailable, None);
    }

    match DensityCurve::estimate_on_range(
        draws,
        lo,
        hi,
        config.density.grid_points,
        config.density.bandwidth_factor,
    ) {
        Ok(curve) => (source, Some(curve)),
        Err(e) => {
            tracing::warn!(error = %e, "density estimation failed");
            (DensitySource::Unavailable, None)
        }
    }
}

/// Compare every treatment group against the baseline
///
/// Records follow ascending treatment identifiers. Fewer than two groups
/// produce no records.
pub fn compare_groups(groups: &[Group], config: &EngineConfig) -> Vec<ComparisonRecord> {
    compare_within(groups, None, config)
}

/// Compare groups cohort by cohort, tagging each record with its cohort
pub fn compare_cohorts(cohorts: &[Cohort], config: &EngineConfig) -> Vec<ComparisonRecord> {
    cohorts
        .iter()
        .flat_map(|c| compare_within(&c.groups, Some(&c.name), config))
        .collect()
}

/// Compare a normalized payload
pub fn compare_input(input: &ComparisonInput, config: &EngineConfig) -> Vec<ComparisonRecord> {
    match input {
        ComparisonInput::Flat(groups) => compare_groups(groups, config),
        ComparisonInput::Cohorts(cohorts) => compare_cohorts(cohorts, config),
    }
}

fn compare_within(
    groups: &[Group],
    cohort: Option<&str>,
    config: &EngineConfig,
) -> Vec<ComparisonRecord> {
    let Some((baseline, treatments)) = split_baseline(groups) else {
        tracing::debug!(groups = groups.len(), ?cohort, "fewer than two groups, nothing to compare");
        return Vec::new();
    };

    #[cfg(feature = "parallel")]
    let records = treatments
        .par_iter()
        .map(|t| compare_pair(baseline, t, cohort, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let records = treatments
        .iter()
        .map(|t| compare_pair(baseline, t, cohort, config))
        .collect();

    records
}
