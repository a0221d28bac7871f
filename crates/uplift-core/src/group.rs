//! Experiment groups
//!
//! A [`Group`] is the strict, normalized shape of one arm of an experiment as
//! delivered by the data source:
//!
//! ```json
//! {"group": 2, "mean": 0.031, "total_revenue": 812.0, "total_order": 26190,
//!  "posterior_samples": [0.030, 0.032, ...]}
//! ```
//!
//! `numerator`/`denominator` are accepted under their metric-specific aliases
//! and may be absent. Missing or `null` posterior samples read as an empty set.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uplift_stats::PosteriorArm;

/// Group identifier as sent by the data source
///
/// Integers order numerically and sort before text identifiers; text
/// identifiers order lexicographically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
#[serde(untagged)]
pub enum GroupId {
    Int(i64),
    Text(String),
}

impl Ord for GroupId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupId::Int(a), GroupId::Int(b)) => a.cmp(b),
            (GroupId::Text(a), GroupId::Text(b)) => a.cmp(b),
            (GroupId::Int(_), GroupId::Text(_)) => Ordering::Less,
            (GroupId::Text(_), GroupId::Int(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for GroupId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Int(id) => write!(f, "{}", id),
            GroupId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for GroupId {
    fn from(id: i64) -> Self {
        GroupId::Int(id)
    }
}

impl From<i32> for GroupId {
    fn from(id: i32) -> Self {
        GroupId::Int(id as i64)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        GroupId::Text(id.to_string())
    }
}

/// One arm of an experiment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "group")]
    pub id: GroupId,
    /// Point estimate of the metric
    pub mean: f64,
    /// e.g. revenue or event count
    #[serde(default, alias = "total_revenue", skip_serializing_if = "Option::is_none")]
    pub numerator: Option<f64>,
    /// e.g. orders or users
    #[serde(default, alias = "total_order", skip_serializing_if = "Option::is_none")]
    pub denominator: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub posterior_samples: Vec<f64>,
}

impl Group {
    pub fn new(id: impl Into<GroupId>, mean: f64, posterior_samples: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            mean,
            numerator: None,
            denominator: None,
            posterior_samples,
        }
    }

    /// Set the numerator and denominator
    pub fn with_counts(mut self, numerator: f64, denominator: f64) -> Self {
        self.numerator = Some(numerator);
        self.denominator = Some(denominator);
        self
    }

    /// View as a posterior arm for the uplift computation
    pub fn arm(&self) -> PosteriorArm<'_> {
        PosteriorArm::new(self.mean, &self.posterior_samples)
    }

    pub fn has_samples(&self) -> bool {
        !self.posterior_samples.is_empty()
    }

    /// Display projection without the posterior draws
    pub fn summary(&self) -> ArmSummary {
        ArmSummary {
            id: self.id.clone(),
            mean: self.mean,
            numerator: self.numerator,
            denominator: self.denominator,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<f64>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Display-side view of a group; absent counts render as unavailable
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ArmSummary {
    pub id: GroupId,
    pub mean: f64,
    pub numerator: Option<f64>,
    pub denominator: Option<f64>,
}

/// Groups sorted by identifier, ascending
pub fn sort_groups(groups: &[Group]) -> Vec<&Group> {
    let mut sorted: Vec<&Group> = groups.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    sorted
}

/// Split groups into the baseline (smallest identifier) and the treatments
///
/// Returns `None` for fewer than two groups.
pub fn split_baseline(groups: &[Group]) -> Option<(&Group, Vec<&Group>)> {
    if groups.len() < 2 {
        return None;
    }
    let mut sorted = sort_groups(groups);
    let baseline = sorted.remove(0);
    Some((baseline, sorted))
}
