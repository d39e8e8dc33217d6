// File: crates/tiden-core/src/config.rs
// Summary: Chart configuration consumed at construction (data location, sizing, labels, animation).

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{Insets, DEFAULT_SIZE_RATIO};

/// Axis captions and the unit suffix used in focus labels.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Labels {
    #[serde(rename = "yAxis", alias = "yaxis")]
    pub y_axis: String,
    pub unit: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self { y_axis: String::new(), unit: "cm".to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Prefix for the data location.
    pub baseurl: String,
    /// Data resource, relative to `baseurl`.
    pub data: String,
    /// Height-to-width ratio for responsive sizing.
    #[serde(alias = "sizeratio")]
    pub size_ratio: f64,
    /// Enables the one-shot stroke reveal on first draw.
    #[serde(alias = "animateline")]
    pub animate_line: bool,
    pub labels: Labels,
    pub margin: Insets,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            baseurl: String::new(),
            data: String::new(),
            size_ratio: DEFAULT_SIZE_RATIO,
            animate_line: false,
            labels: Labels::default(),
            margin: Insets::default(),
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: ChartConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a file; the format (JSON, TOML, YAML) follows the extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        let cfg: ChartConfig = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.size_ratio.is_finite() || self.size_ratio <= 0.0 {
            return Err(ConfigError::InvalidSizeRatio(self.size_ratio));
        }
        Ok(())
    }

    /// Full data location: `baseurl` followed by `data`.
    pub fn data_location(&self) -> String {
        format!("{}{}", self.baseurl, self.data)
    }
}
