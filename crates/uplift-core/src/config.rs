//! Configuration for uplift-core
//!
//! Centralized configuration for decision thresholds, density estimation,
//! violin geometry, cohort presentation, and the metric catalog the UI layer
//! offers. Every section has a default matching the dashboard's behavior, so
//! a partial document only needs the values it changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uplift_stats::{UpliftThresholds, DEFAULT_BANDWIDTH_FACTOR, DEFAULT_SYNTHETIC_DRAWS};

use crate::error::{ConfigError, ConfigResult};
use crate::violin::ViolinConfig;

/// Largest density grid accepted; KDE cost grows with samples * grid points
pub const MAX_GRID_POINTS: usize = 8000;

/// Engine-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Credible level and verdict thresholds
    pub uplift: UpliftThresholds,
    /// Density estimation settings
    pub density: DensityConfig,
    /// Violin pixel extent
    pub violin: ViolinConfig,
    /// Cohort ordering and colors
    pub cohorts: CohortConfig,
    /// Metric catalog for the UI layer
    pub metrics: MetricCatalog,
}

/// Density estimation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    /// Number of grid points spanning the credible interval
    pub grid_points: usize,
    /// Bandwidth as a multiple of the sample standard deviation
    pub bandwidth_factor: f64,
    /// Draws synthesized when only a summary is available
    pub synthetic_draws: usize,
    /// Seed for synthesized draws
    pub synthetic_seed: u64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            grid_points: 200,
            bandwidth_factor: DEFAULT_BANDWIDTH_FACTOR,
            synthetic_draws: DEFAULT_SYNTHETIC_DRAWS,
            synthetic_seed: 42,
        }
    }
}

/// Cohort presentation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohortConfig {
    /// Display order of known cohorts; unknown cohorts follow alphabetically
    pub order: Vec<String>,
    /// Series color per cohort
    pub palette: BTreeMap<String, String>,
    /// Color for cohorts missing from the palette
    pub fallback_color: String,
    /// Drop the first (incomplete) point of every merged trend series
    pub drop_leading_point: bool,
}

impl Default for CohortConfig {
    fn default() -> Self {
        let palette = [
            ("d1", "#3B6FF5"),
            ("d3", "#27ae60"),
            ("d7", "#FF9900"),
            ("d15", "#e74c3c"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            order: ["d1", "d3", "d7", "d15"].map(String::from).to_vec(),
            palette,
            fallback_color: "#888888".to_string(),
            drop_leading_point: true,
        }
    }
}

impl CohortConfig {
    /// Sort cohort names: configured order first, then the rest alphabetically
    pub fn ordered<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = names.into_iter().collect();
        names.sort_by_key(|name| {
            let rank = self
                .order
                .iter()
                .position(|known| known == name)
                .unwrap_or(self.order.len());
            (rank, *name)
        });
        names.dedup();
        names
    }

    /// Series color for a cohort
    pub fn color_for(&self, cohort: &str) -> &str {
        self.palette
            .get(cohort)
            .map(String::as_str)
            .unwrap_or(&self.fallback_color)
    }
}

/// A selectable metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricOption {
    pub key: String,
    pub label: String,
}

impl MetricOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Metric category -> ordered metric options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricCatalog {
    pub categories: BTreeMap<String, Vec<MetricOption>>,
}

impl Default for MetricCatalog {
    fn default() -> Self {
        let entries: [(&str, &[(&str, &str)]); 4] = [
            (
                "business",
                &[
                    ("aov", "AOV"),
                    ("arpu", "ARPU"),
                    ("arppu", "ARPPU"),
                    ("payment_rate_all", "Payment Rate All"),
                    ("payment_rate_new", "Payment Rate New"),
                    ("AOV_new_day", "AOV New Day1"),
                    ("cancel_sub_day", "Cancel Sub Day3"),
                    ("subscribe_new_day_aov", "Subscribe New Day1 AOV"),
                ],
            ),
            (
                "chat",
                &[
                    ("click_rate", "Click Rate"),
                    ("explore_start_chat_rate", "Explore Start Chat Rate"),
                    ("avg_chat_rounds", "Avg Chat Rounds"),
                    ("first_chat_bot", "First Chat Bot"),
                    ("avg_click_bots", "Avg Click Bots"),
                    ("avg_time_spent", "Avg Time Spent"),
                    ("explore_click_rate", "Explore Click Rate"),
                    ("explore_avg_chat_rounds", "Explore Avg Chat Rounds"),
                ],
            ),
            (
                "engagement",
                &[
                    ("continue", "Continue"),
                    ("conversation_reset", "Conversation Reset"),
                    ("edit", "Edit"),
                    ("follow", "Follow"),
                    ("new_conversation", "New Conversation"),
                    ("regen", "Regen"),
                ],
            ),
            (
                "retention",
                &[
                    ("all_retention", "All Retention"),
                    ("new_retention", "New Retention"),
                ],
            ),
        ];

        let categories = entries
            .iter()
            .map(|(category, options)| {
                let options = options
                    .iter()
                    .map(|(key, label)| MetricOption::new(*key, *label))
                    .collect();
                (category.to_string(), options)
            })
            .collect();

        Self { categories }
    }
}

impl MetricCatalog {
    /// Options of a category in display order; empty for unknown categories
    pub fn options(&self, category: &str) -> &[MetricOption] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Display label of a metric key in any category
    pub fn label_for(&self, key: &str) -> Option<&str> {
        self.categories
            .values()
            .flatten()
            .find(|option| option.key == key)
            .map(|option| option.label.as_str())
    }

    /// Category containing a metric key
    pub fn category_of(&self, key: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, options)| options.iter().any(|option| option.key == key))
            .map(|(category, _)| category.as_str())
    }
}

impl EngineConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate configuration from a TOML string
    #[cfg(feature = "toml-config")]
    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    #[cfg(feature = "toml-config")]
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load and validate configuration from a JSON string
    pub fn from_json(json_str: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        let uplift = &self.uplift;
        if !(uplift.credible_level > 0.0 && uplift.credible_level < 1.0) {
            return Err(ConfigError::OutOfRange(
                "credible_level must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&uplift.win_above) || !(0.0..=1.0).contains(&uplift.lose_below)
        {
            return Err(ConfigError::OutOfRange(
                "win_above and lose_below must be between 0.0 and 1.0".to_string(),
            ));
        }
        if uplift.lose_below >= uplift.win_above {
            return Err(ConfigError::InvalidThresholds(
                "win_above must be greater than lose_below".to_string(),
            ));
        }

        let density = &self.density;
        if density.grid_points < 2 || density.grid_points > MAX_GRID_POINTS {
            return Err(ConfigError::OutOfRange(format!(
                "grid_points must be between 2 and {}",
                MAX_GRID_POINTS
            )));
        }
        if !(density.bandwidth_factor > 0.0 && density.bandwidth_factor.is_finite()) {
            return Err(ConfigError::OutOfRange(
                "bandwidth_factor must be positive".to_string(),
            ));
        }
        if density.synthetic_draws < 2 {
            return Err(ConfigError::OutOfRange(
                "synthetic_draws must be at least 2".to_string(),
            ));
        }

        let violin = &self.violin;
        if !(violin.width > 0.0 && violin.height > 0.0) {
            return Err(ConfigError::OutOfRange(
                "violin width and height must be positive".to_string(),
            ));
        }
        if !(violin.fill_ratio > 0.0 && violin.fill_ratio <= 1.0) {
            return Err(ConfigError::OutOfRange(
                "fill_ratio must be in (0.0, 1.0]".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.density.grid_points, 200);
        assert_eq!(config.violin.width, 100.0);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_json() {
        let config =
            EngineConfig::from_json(r#"{"density": {"grid_points": 400}, "uplift": {"win_above": 0.9, "lose_below": 0.1, "credible_level": 0.9}}"#)
                .unwrap();
        assert_eq!(config.density.grid_points, 400);
        assert_eq!(config.density.bandwidth_factor, 0.4);
        assert_eq!(config.uplift.win_above, 0.9);
        assert_eq!(config.cohorts.order.len(), 4);
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut config = EngineConfig::default();
        config.uplift.win_above = 0.05;
        config.uplift.lose_below = 0.95;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThresholds(_))
        ));
    }

    #[test]
    fn test_out_of_range() {
        let mut config = EngineConfig::default();
        config.density.grid_points = MAX_GRID_POINTS + 1;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.violin.fill_ratio = 0.0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.uplift.credible_level = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_cohort_ordering() {
        let cohorts = CohortConfig::default();
        let ordered = cohorts.ordered(["d15", "weekly", "d1", "d7", "agg"]);
        assert_eq!(ordered, vec!["d1", "d7", "d15", "agg", "weekly"]);
    }

    #[test]
    fn test_cohort_colors() {
        let cohorts = CohortConfig::default();
        assert_eq!(cohorts.color_for("d3"), "#27ae60");
        assert_eq!(cohorts.color_for("d30"), "#888888");
    }

    #[test]
    fn test_metric_catalog() {
        let catalog = MetricCatalog::default();
        assert_eq!(catalog.options("retention").len(), 2);
        assert_eq!(catalog.options("business")[0].label, "AOV");
        assert_eq!(catalog.label_for("avg_chat_rounds"), Some("Avg Chat Rounds"));
        assert_eq!(catalog.category_of("regen"), Some("engagement"));
        assert!(catalog.options("unknown").is_empty());
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(EngineConfig::from_toml(&text).unwrap(), config);
    }
}
