//! JSON configuration loading
//!
//! Missing fields take their defaults, so the smallest useful file is `{}`:
//!
//! ```json
//! {
//!   "tick_interval_ms": 10000,
//!   "filter_window": 8,
//!   "thresholds": { "co2": 75.0 },
//!   "unknown_policy": "abstains"
//! }
//! ```
//!
//! The parsed configuration is validated before it is returned.

use std::fs;
use std::path::{Path, PathBuf};

use airguard_core::{ConfigError, PipelineConfig};
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// File could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        /// Configuration file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Not valid JSON, or wrong field types
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}

/// Parse and validate a JSON configuration
pub fn parse_config(json: &str) -> Result<PipelineConfig, ConfigLoadError> {
    let config: PipelineConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a JSON configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig, ConfigLoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_config(&json)?;
    log::info!(
        "Loaded configuration from {}: tick {}ms, window {}",
        path.display(),
        config.tick_interval_ms,
        config.filter_window
    );
    Ok(config)
}
