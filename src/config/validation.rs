//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (deadlines > 0, limits > 0)
//! - Check backend-specific settings (URL for payload, directory for git)
//! - Keep the HTTP request timeout above the worst-case CMS wait
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{CmsBackend, SiteConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than 0"));
    }

    if config.cms.timeout_ms == 0 {
        errors.push(ValidationError::new("cms.timeout_ms", "must be greater than 0"));
    }
    if config.cms.init_timeout_ms == Some(0) {
        errors.push(ValidationError::new("cms.init_timeout_ms", "must be greater than 0"));
    }
    // A request waits for client init, then one round of concurrent queries.
    let cms_budget_ms = config.cms.init_timeout_ms().saturating_add(config.cms.timeout_ms);
    if config.server.request_timeout_secs > 0
        && config.server.request_timeout_secs.saturating_mul(1000) <= cms_budget_ms
    {
        errors.push(ValidationError::new(
            "server.request_timeout_secs",
            format!(
                "{}s must exceed the CMS deadlines ({cms_budget_ms} ms for init plus query)",
                config.server.request_timeout_secs
            ),
        ));
    }
    match config.cms.backend {
        CmsBackend::Payload => {
            if let Err(e) = url::Url::parse(&config.cms.base_url) {
                errors.push(ValidationError::new(
                    "cms.base_url",
                    format!("'{}' is not a valid URL: {e}", config.cms.base_url),
                ));
            }
        }
        CmsBackend::Git => {
            if config.cms.content_dir.as_os_str().is_empty() {
                errors.push(ValidationError::new("cms.content_dir", "must not be empty"));
            }
        }
        CmsBackend::Memory => {}
    }

    if config.content.max_docs == 0 {
        errors.push(ValidationError::new("content.max_docs", "must be greater than 0"));
    }
    if let Some(base) = &config.content.media_base_url {
        if url::Url::parse(base).is_err() {
            errors.push(ValidationError::new(
                "content.media_base_url",
                format!("'{base}' is not a valid URL"),
            ));
        }
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("'{}' is not one of {}", config.observability.log_level, LOG_LEVELS.join(", ")),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&SiteConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SiteConfig::default();
        config.cms.timeout_ms = 0;
        config.cms.base_url = "cms".to_string();
        config.content.max_docs = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["cms.timeout_ms", "cms.base_url", "content.max_docs", "observability.log_level"]
        );
    }

    #[test]
    fn test_base_url_ignored_for_git_backend() {
        let mut config = SiteConfig::default();
        config.cms.backend = CmsBackend::Git;
        config.cms.base_url = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_init_timeout_rejected() {
        let mut config = SiteConfig::default();
        config.cms.init_timeout_ms = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].to_string(), "cms.init_timeout_ms: must be greater than 0");
    }

    #[test]
    fn test_request_timeout_must_outlast_cms_deadlines() {
        let mut config = SiteConfig::default();
        config.cms.timeout_ms = 6000;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "server.request_timeout_secs");

        config.cms.init_timeout_ms = Some(1000);
        assert!(validate_config(&config).is_ok());

        config.server.request_timeout_secs = 20;
        config.cms.init_timeout_ms = None;
        assert!(validate_config(&config).is_ok());
    }
}
