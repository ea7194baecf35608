//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Build the `Site` and start background tasks (config watcher, signals)
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - The listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::cms::CmsError;
use crate::config::watcher::ConfigWatcher;
use crate::config::{load_or_default, ConfigError, SiteConfig};
use crate::content::Site;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::observability::{logging, metrics};

/// Fatal startup failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("CMS backend: {0}")]
    Cms(#[from] CmsError),

    #[error("invalid {field} '{value}'")]
    Address { field: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load configuration and bring up logging. First step of every entry point.
pub fn prepare(config_path: Option<&std::path::Path>) -> Result<SiteConfig, StartupError> {
    let config = load_or_default(config_path)?;
    logging::init(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.cms.backend,
        timeout_ms = config.cms.timeout_ms,
        "Configuration loaded"
    );
    Ok(config)
}

/// Serve the content API until a shutdown signal arrives.
pub async fn serve(config: SiteConfig, config_path: Option<PathBuf>) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::Address {
                field: "observability.metrics_address",
                value: config.observability.metrics_address.clone(),
            })?;
        metrics::init_metrics(addr);
    }

    let site = Site::from_config(&config)?;
    let server = HttpServer::new(&config, site);

    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let _watcher = match &config_path {
        Some(path) => match ConfigWatcher::new(path, config_tx.clone()).run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Config hot reload disabled");
                None
            }
        },
        None => None,
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn(shutdown.clone(), config_path, config_tx);

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, config_rx, server_shutdown).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_reports_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(&path, "[cms]\ntimeout_ms = 0\n").unwrap();

        let err = prepare(Some(&path)).unwrap_err();
        assert!(matches!(err, StartupError::Config(ConfigError::Validation(_))));
    }

    #[tokio::test]
    async fn test_serve_rejects_bad_metrics_address() {
        let mut config = SiteConfig::default();
        config.cms.backend = crate::config::CmsBackend::Memory;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "nowhere".into();

        let err = serve(config, None).await.unwrap_err();
        assert!(err.to_string().contains("observability.metrics_address"));
    }
}
