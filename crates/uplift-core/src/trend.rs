//! Trend series merging
//!
//! Cohort experiments deliver one trend per cohort, each with its own
//! variations. For a single chart they are merged into one series set: one
//! line per (cohort, variation), colored per cohort, the first variation of
//! each cohort drawn solid and the others dashed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::CohortConfig;
use crate::group::GroupId;

/// Relative padding added around a varying value range
const RANGE_PADDING: f64 = 0.1;

/// Relative padding around a flat value range
const FLAT_RANGE_PADDING: f64 = 0.05;

/// Ranges this close to zero cannot be drawn
const MIN_DRAWABLE: f64 = 1e-6;

/// One variation's values over the trend dates; gaps are `None`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub variation: GroupId,
    #[serde(default)]
    pub data: Vec<Option<f64>>,
}

impl TrendSeries {
    /// Whether any value is strictly positive; other series are not drawn
    pub fn is_plottable(&self) -> bool {
        self.data.iter().flatten().any(|&v| v > 0.0)
    }
}

/// Trend of a single cohort
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortTrend {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub series: Vec<TrendSeries>,
}

/// One drawable line
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// `"{COHORT}-{variation}"`
    pub name: String,
    pub cohort: String,
    pub variation: GroupId,
    pub data: Vec<Option<f64>>,
    pub dashed: bool,
    pub color: String,
}

/// Series of all cohorts on one shared date axis
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedTrend {
    pub dates: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl MergedTrend {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Padded `(min, max)` over every value, or `None` when nothing is drawable
    pub fn value_range(&self) -> Option<(f64, f64)> {
        value_range(self.series.iter().flat_map(|s| s.data.iter().flatten().copied()))
    }
}

/// Merge per-cohort trends into one chart series set
///
/// Cohorts are visited in configured order. The date axis is taken from the
/// first cohort that has dates; cohorts without dates contribute nothing.
pub fn merge_cohort_trends(
    trends: &BTreeMap<String, CohortTrend>,
    config: &CohortConfig,
) -> MergedTrend {
    let skip = usize::from(config.drop_leading_point);
    let mut merged = MergedTrend::default();

    for name in config.ordered(trends.keys().map(String::as_str)) {
        let Some(trend) = trends.get(name) else {
            continue;
        };
        if trend.dates.is_empty() {
            tracing::debug!(cohort = name, "cohort trend has no dates, skipping");
            continue;
        }
        if merged.dates.is_empty() {
            merged.dates = trend.dates.iter().skip(skip).map(|d| date_label(d)).collect();
        }

        let color = config.color_for(name);
        for (idx, series) in trend.series.iter().enumerate() {
            merged.series.push(ChartSeries {
                name: format!("{}-{}", name.to_uppercase(), series.variation),
                cohort: name.to_string(),
                variation: series.variation.clone(),
                data: series.data.iter().skip(skip).copied().collect(),
                dashed: idx > 0,
                color: color.to_string(),
            });
        }
    }

    merged
}

/// Plottable series of a single trend, with the shared date labels
pub fn plottable_trend(trend: &CohortTrend) -> MergedTrend {
    let series = trend
        .series
        .iter()
        .filter(|s| s.is_plottable())
        .enumerate()
        .map(|(idx, s)| ChartSeries {
            name: s.variation.to_string(),
            cohort: String::new(),
            variation: s.variation.clone(),
            data: s.data.clone(),
            dashed: idx > 0,
            color: String::new(),
        })
        .collect();

    MergedTrend {
        dates: trend.dates.iter().map(|d| date_label(d)).collect(),
        series,
    }
}

/// Padded value range for a trend chart
///
/// Non-finite values are ignored. A flat range is widened by 5% on each
/// side, any other by 10% of its span. Returns `None` when there are no
/// values or both ends sit at zero.
pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;

    let (lo, hi) = if min == max {
        let a = min * (1.0 - FLAT_RANGE_PADDING);
        let b = max * (1.0 + FLAT_RANGE_PADDING);
        (a.min(b), a.max(b))
    } else {
        let pad = (max - min) * RANGE_PADDING;
        (min - pad, max + pad)
    };

    if lo.abs() < MIN_DRAWABLE && hi.abs() < MIN_DRAWABLE {
        return None;
    }
    Some((lo, hi))
}

/// Calendar-date part of a timestamp label
fn date_label(raw: &str) -> String {
    raw.chars().take(10).collect()
}
