//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the content
//! service. All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::resilience::{TimeoutPolicy, DEFAULT_TIMEOUT_MS};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// CMS backend selection and deadlines.
    pub cms: CmsConfig,

    /// Content shaping settings.
    pub content: ContentConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Which CMS integration serves content.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CmsBackend {
    /// Document-database CMS over its REST API.
    #[default]
    Payload,
    /// Git-based CMS content checked out on disk.
    Git,
    /// Empty in-process source (local preview).
    Memory,
}

impl std::str::FromStr for CmsBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "payload" => Ok(CmsBackend::Payload),
            "git" => Ok(CmsBackend::Git),
            "memory" => Ok(CmsBackend::Memory),
            other => Err(format!("unknown CMS backend '{other}'")),
        }
    }
}

/// CMS connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CmsConfig {
    /// Backend integration.
    pub backend: CmsBackend,

    /// CMS server URL (payload backend).
    pub base_url: String,

    /// Optional API key (payload backend).
    pub api_key: Option<String>,

    /// Auth collection the API key belongs to.
    pub api_key_collection: String,

    /// Content checkout root (git backend).
    pub content_dir: PathBuf,

    /// Deadline for every CMS query in milliseconds.
    pub timeout_ms: u64,

    /// Deadline for client initialization; defaults to `timeout_ms`.
    pub init_timeout_ms: Option<u64>,

    /// What happens to calls that miss the deadline.
    pub timeout_policy: TimeoutPolicy,
}

impl CmsConfig {
    /// Effective client init deadline.
    pub fn init_timeout_ms(&self) -> u64 {
        self.init_timeout_ms.unwrap_or(self.timeout_ms)
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            backend: CmsBackend::Payload,
            base_url: "http://localhost:3001".to_string(),
            api_key: None,
            api_key_collection: "users".to_string(),
            content_dir: PathBuf::from("content"),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            init_timeout_ms: None,
            timeout_policy: TimeoutPolicy::Detach,
        }
    }
}

/// Content shaping configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    /// Prefix for relative media URLs (e.g., "https://cms.example.com").
    pub media_base_url: Option<String>,

    /// Upper bound on documents fetched per collection query.
    pub max_docs: usize,

    /// Related items shown on detail pages.
    pub related_limit: usize,

    /// Site name used as the last SEO title fallback.
    pub site_title: String,

    /// Site description used as the last SEO description fallback.
    pub site_description: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            media_base_url: None,
            max_docs: 100,
            related_limit: 3,
            site_title: crate::content::seo::DEFAULT_TITLE.to_string(),
            site_description: crate::content::seo::DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
