//! Configuration management
//!
//! Every section has defaults reproducing the standard run, so a TOML file
//! only needs the values it changes.

use crate::data::yahoo::endpoints;
use crate::features::FeatureConfig;
use crate::models::ModelConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Data source configuration
///
/// The instrument is always gold futures; only the transport is configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// Chart API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_url: endpoints::QUERY1.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Train/test split configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of rows held out for testing
    pub test_ratio: f64,
    /// Shuffle seed
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
        }
    }
}

/// Report configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows shown in the data preview
    pub preview_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { preview_rows: 5 }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data: DataConfig,
    pub features: FeatureConfig,
    pub split: SplitConfig,
    pub models: ModelConfig,
    pub report: ReportConfig,
}

impl PipelineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();

        assert_eq!(config.data.base_url, "https://query1.finance.yahoo.com");
        assert_eq!(config.split.test_ratio, 0.2);
        assert_eq!(config.split.seed, 42);
        assert_eq!(config.features.long_ma, 30);
        assert_eq!(config.models.gradient_boosting.n_estimators, 100);
        assert_eq!(config.models.gradient_boosting.max_depth, 3);
        assert_eq!(config.models.random_forest.n_trees, 100);
        assert_eq!(config.report.preview_rows, 5);
    }

    #[test]
    fn test_partial_toml() {
        let config = PipelineConfig::from_toml(
            r#"
            [split]
            seed = 7

            [models.random_forest]
            n_trees = 25
            "#,
        )
        .unwrap();

        assert_eq!(config.split.seed, 7);
        assert_eq!(config.split.test_ratio, 0.2);
        assert_eq!(config.models.random_forest.n_trees, 25);
        assert_eq!(config.models.random_forest.seed, 42);
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(PipelineConfig::from_toml("[split]\ntest_ratio = \"a lot\"").is_err());
    }

    #[test]
    fn test_instrument_is_not_configurable() {
        let err = PipelineConfig::from_toml("[data]\nticker = \"SI=F\"").unwrap_err();
        assert!(format!("{:#}", err).contains("ticker"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[data]\ntimeout_secs = 5\n\n[report]\npreview_rows = 10\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.data.timeout_secs, 5);
        assert_eq!(config.report.preview_rows, 10);
        assert_eq!(config.split, SplitConfig::default());

        assert!(PipelineConfig::load(dir.path().join("missing.toml")).is_err());
    }
}
