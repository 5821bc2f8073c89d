//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::DashboardConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `dashboard.featured_validator`.
pub const FEATURED_VALIDATOR_ENV_VAR: &str = "COMSTAKE_FEATURED_VALIDATOR";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse, apply environment overrides, and validate configuration text.
pub fn parse_config(content: &str) -> Result<DashboardConfig, ConfigError> {
    let mut config: DashboardConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides on top of file values.
pub fn apply_env_overrides(config: &mut DashboardConfig) {
    if let Ok(featured) = std::env::var(FEATURED_VALIDATOR_ENV_VAR) {
        if !featured.trim().is_empty() {
            config.dashboard.featured_validator = featured.trim().to_string();
        }
    }
}
