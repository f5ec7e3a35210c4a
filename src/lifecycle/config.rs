//! Pipeline configuration.
//!
//! Layered: defaults, then a TOML file, then environment, then the CLI (in
//! the binary). Only the log backend identifier matters to this crate; the
//! other fields drive the demo orchestrator.
//!
//! ```toml
//! log_factory = "tracing"
//! pipeline_name = "rating"
//! cycle_interval_ms = 50
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_LOG_FACTORY: &str = "PIPELINE_LOG_FACTORY";
pub const ENV_PIPELINE_NAME: &str = "PIPELINE_NAME";
pub const ENV_CYCLE_MS: &str = "PIPELINE_CYCLE_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Identifier of the log backend, looked up in the factory catalog.
    pub log_factory: Option<String>,
    pub pipeline_name: String,
    pub cycle_interval_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_factory: None,
            pipeline_name: "pipeline".to_string(),
            cycle_interval_ms: 100,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Defaults overlaid with the `PIPELINE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlays values from `lookup` (keyed by the `ENV_*` names) onto `self`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(identifier) = lookup(ENV_LOG_FACTORY) {
            self.log_factory = Some(identifier);
        }
        if let Some(name) = lookup(ENV_PIPELINE_NAME) {
            self.pipeline_name = name;
        }
        if let Some(value) = lookup(ENV_CYCLE_MS) {
            match value.trim().parse() {
                Ok(ms) => self.cycle_interval_ms = ms,
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_CYCLE_MS,
                        value,
                    })
                }
            }
        }
        Ok(self)
    }

    /// The configured backend identifier; empty when unset.
    pub fn log_factory_identifier(&self) -> &str {
        self.log_factory.as_deref().unwrap_or_default()
    }
}
