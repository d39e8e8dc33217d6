// File: crates/tiden-core/src/error.rs
// Summary: Error types for configuration and data loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse chart config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to load chart config: {0}")]
    Load(#[from] config::ConfigError),
    #[error("sizeRatio must be finite and positive, got {0}")]
    InvalidSizeRatio(f64),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read data from {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("data source has no header row")]
    MissingHeader,
}
