//! Normalization of data-source payloads
//!
//! The data source delivers groups in one of three shapes:
//!
//! - a bare array of group objects
//! - an object with a `groups` array
//! - an object keyed by cohort name (e.g. `d1`, `d3`, `d7`, `d15`), each
//!   holding a group array
//!
//! Everything is normalized into [`ComparisonInput`] here, before the engine
//! sees it. Type violations inside a group fail fast with the offending
//! location.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::CohortConfig;
use crate::error::{PayloadError, PayloadResult};
use crate::group::Group;

/// Groups belonging to one named cohort
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    pub name: String,
    pub groups: Vec<Group>,
}

/// Normalized comparison input
#[derive(Clone, Debug, PartialEq)]
pub enum ComparisonInput {
    /// A single set of groups
    Flat(Vec<Group>),
    /// Groups bucketed by cohort, in display order
    Cohorts(Vec<Cohort>),
}

impl ComparisonInput {
    /// Total number of groups across all cohorts
    pub fn group_count(&self) -> usize {
        match self {
            ComparisonInput::Flat(groups) => groups.len(),
            ComparisonInput::Cohorts(cohorts) => cohorts.iter().map(|c| c.groups.len()).sum(),
        }
    }

    /// All groups in one list, cohort tags dropped
    pub fn into_flat(self) -> Vec<Group> {
        match self {
            ComparisonInput::Flat(groups) => groups,
            ComparisonInput::Cohorts(cohorts) => {
                cohorts.into_iter().flat_map(|c| c.groups).collect()
            }
        }
    }
}

/// Parse a JSON payload document
pub fn parse_payload(json: &str, cohorts: &CohortConfig) -> PayloadResult<ComparisonInput> {
    let value: Value = serde_json::from_str(json)?;
    normalize_payload(value, cohorts)
}

/// Normalize an already parsed payload
pub fn normalize_payload(value: Value, cohorts: &CohortConfig) -> PayloadResult<ComparisonInput> {
    match value {
        Value::Array(items) => Ok(ComparisonInput::Flat(parse_groups(items, "groups")?)),
        Value::Object(mut map) => {
            if let Some(groups) = map.remove("groups") {
                let Value::Array(items) = groups else {
                    return Err(PayloadError::UnexpectedShape {
                        expected: "array under \"groups\"",
                        actual: kind_of(&groups).to_string(),
                    });
                };
                return Ok(ComparisonInput::Flat(parse_groups(items, "groups")?));
            }

            let names = cohorts.ordered(map.keys().map(String::as_str));
            let mut parsed = Vec::with_capacity(names.len());
            for name in names {
                let items = match map.get(name) {
                    Some(Value::Array(items)) => items.clone(),
                    Some(Value::Null) | None => continue,
                    Some(other) => {
                        return Err(PayloadError::UnexpectedShape {
                            expected: "array of groups per cohort",
                            actual: format!("{} under \"{}\"", kind_of(other), name),
                        })
                    }
                };
                parsed.push(Cohort {
                    name: name.to_string(),
                    groups: parse_groups(items, name)?,
                });
            }

            tracing::debug!(cohorts = parsed.len(), "normalized cohort payload");
            Ok(ComparisonInput::Cohorts(parsed))
        }
        other => Err(PayloadError::UnexpectedShape {
            expected: "array or object",
            actual: kind_of(&other).to_string(),
        }),
    }
}

fn parse_groups(items: Vec<Value>, context: &str) -> PayloadResult<Vec<Group>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| PayloadError::InvalidGroup {
                location: format!("{}[{}]", context, index),
                source,
            })
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
