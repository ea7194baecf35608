//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::SiteConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override the config file.
pub const ENV_BACKEND: &str = "CMS_BACKEND";
pub const ENV_URL: &str = "CMS_URL";
pub const ENV_API_KEY: &str = "CMS_API_KEY";
pub const ENV_CONTENT_DIR: &str = "CMS_CONTENT_DIR";
pub const ENV_TIMEOUT_MS: &str = "CMS_TIMEOUT_MS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}: {message}")]
    Env { name: &'static str, message: String },

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

/// Load, override from the process environment, and validate a TOML file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: SiteConfig = toml::from_str(&content)?;
    finish(&mut config)?;
    Ok(config)
}

/// Like `load_config`, but a missing path yields defaults plus environment.
pub fn load_or_default(path: Option<&Path>) -> Result<SiteConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = SiteConfig::default();
            finish(&mut config)?;
            Ok(config)
        }
    }
}

fn finish(config: &mut SiteConfig) -> Result<(), ConfigError> {
    apply_overrides(config, |name| std::env::var(name).ok())?;
    validate_config(config).map_err(ConfigError::Validation)
}

/// Apply environment-style overrides read through `var`.
pub fn apply_overrides<F>(config: &mut SiteConfig, var: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = var(ENV_BACKEND) {
        config.cms.backend = value.parse().map_err(|message| ConfigError::Env {
            name: ENV_BACKEND,
            message,
        })?;
    }
    if let Some(value) = var(ENV_URL) {
        config.cms.base_url = value;
    }
    if let Some(value) = var(ENV_API_KEY) {
        config.cms.api_key = Some(value);
    }
    if let Some(value) = var(ENV_CONTENT_DIR) {
        config.cms.content_dir = value.into();
    }
    if let Some(value) = var(ENV_TIMEOUT_MS) {
        config.cms.timeout_ms = value.trim().parse().map_err(|e| ConfigError::Env {
            name: ENV_TIMEOUT_MS,
            message: format!("'{value}' is not a number of milliseconds: {e}"),
        })?;
    }
    Ok(())
}
