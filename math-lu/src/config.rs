//! Factorization configuration
//!
//! [`LuConfig`] selects the pivot policy and the parallel cutoff. It can be
//! built in code or loaded from a JSON or TOML file, with the format picked
//! from the file extension.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the factorizer treats a small pivot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PivotPolicy {
    /// Never check the pivot: a zero pivot yields inf/NaN in L and U
    #[default]
    Permissive,
    /// Fail with `LuError::SingularMatrix` when a pivot magnitude is at or
    /// below the threshold
    Strict {
        /// Absolute threshold. When absent, `eps * m * max|A_ij|` is used.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tolerance: Option<f64>,
    },
}

impl PivotPolicy {
    /// Returns `true` for any strict variant
    pub fn is_strict(&self) -> bool {
        matches!(self, PivotPolicy::Strict { .. })
    }
}

/// LU factorization configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuConfig {
    /// Distribute the rows of large stages over rayon workers. Only used
    /// with the `parallel` feature.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Minimum number of rows below the pivot before a stage is eliminated
    /// in parallel. Only used with the `parallel` feature.
    #[serde(default = "default_parallel_min_rows")]
    pub parallel_min_rows: usize,
    /// Pivot policy (default: permissive)
    #[serde(default)]
    pub pivoting: PivotPolicy,
}

fn default_parallel() -> bool {
    true
}

fn default_parallel_min_rows() -> usize {
    128
}

impl Default for LuConfig {
    fn default() -> Self {
        Self {
            pivoting: PivotPolicy::Permissive,
            parallel: default_parallel(),
            parallel_min_rows: default_parallel_min_rows(),
        }
    }
}

impl LuConfig {
    /// Strict pivoting with the machine-epsilon relative threshold
    pub fn strict() -> Self {
        Self {
            pivoting: PivotPolicy::Strict { tolerance: None },
            ..Self::default()
        }
    }

    /// Strict pivoting with an absolute threshold
    pub fn strict_with_tolerance(tolerance: f64) -> Self {
        Self {
            pivoting: PivotPolicy::Strict {
                tolerance: Some(tolerance),
            },
            ..Self::default()
        }
    }

    /// Never use the parallel path
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Load a configuration file (.json or .toml)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }
}

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// TOML format
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Load a configuration from a file
///
/// Format is auto-detected from file extension (.json or .toml)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LuConfig, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

    let content = fs::read_to_string(path)?;
    log::debug!("loading LU configuration from {}", path.display());
    parse_config(&content, format)
}

/// Parse a configuration from a string
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<LuConfig, ConfigError> {
    match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
    }
}

/// Save a configuration to a file
pub fn save_config<P: AsRef<Path>>(config: &LuConfig, path: P) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

    let content = serialize_config(config, format)?;
    fs::write(path, content)?;
    Ok(())
}

/// Serialize a configuration to a string
pub fn serialize_config(config: &LuConfig, format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string())),
        ConfigFormat::Toml => {
            toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialize error
    #[error("Serialize error: {0}")]
    SerializeError(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
