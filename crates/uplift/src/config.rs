//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use uplift_features::FeatureBuilderConfig;
use uplift_prep::{DailyAggregatorConfig, DateCompleterConfig, MergerConfig};

/// Configuration of all four stages.
///
/// Every field defaults, so a partial JSON document is enough:
///
/// ```
/// let config = uplift::PipelineConfig::from_json(
///     r#"{ "features": { "product_features": ["category"] } }"#,
/// )
/// .unwrap();
/// assert_eq!(config.features.product_features, vec!["category"]);
/// assert_eq!(config.merger.days_per_week, 7);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Merger settings
    pub merger: MergerConfig,
    /// DailyAggregator settings
    pub daily: DailyAggregatorConfig,
    /// DateCompleter settings
    pub completer: DateCompleterConfig,
    /// FeatureBuilder settings
    pub features: FeatureBuilderConfig,
}

impl PipelineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the configuration as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
