//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::config::validation::{describe, validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", describe(.0))]
    Validation(Vec<ValidationError>),
}

/// Parse a configuration from TOML text without validating it.
///
/// CLI overrides are applied on top before validation, so the two steps are
/// kept apart.
pub fn parse_config(content: &str) -> Result<GateConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Read a TOML file into an unvalidated configuration.
pub fn read_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
