//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGTERM, SIGINT, SIGHUP)
//! - Translate signals to internal events
//! - Trigger appropriate actions (shutdown, reload)
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers config reload, not shutdown
//! - Without a config file, SIGHUP is logged and ignored

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::schema::SiteConfig;
use crate::config::watcher;
use crate::lifecycle::shutdown::Shutdown;

/// Spawn the signal loop. Ends after triggering shutdown.
pub fn spawn(
    shutdown: Shutdown,
    config_path: Option<PathBuf>,
    config_tx: mpsc::UnboundedSender<SiteConfig>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_shutdown(&config_path, &config_tx).await;
        shutdown.trigger();
    })
}

#[cfg(unix)]
async fn wait_for_shutdown(
    config_path: &Option<PathBuf>,
    config_tx: &mpsc::UnboundedSender<SiteConfig>,
) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut terminate, mut hangup) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::hangup()),
    ) {
        (Ok(terminate), Ok(hangup)) => (terminate, hangup),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Unix signal handlers unavailable; Ctrl+C only");
            ctrl_c().await;
            return;
        }
    };

    loop {
        tokio::select! {
            _ = ctrl_c() => return,
            _ = terminate.recv() => {
                tracing::info!(signal = "SIGTERM", "Shutdown requested");
                return;
            }
            _ = hangup.recv() => reload(config_path, config_tx),
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown(
    _config_path: &Option<PathBuf>,
    _config_tx: &mpsc::UnboundedSender<SiteConfig>,
) {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!(signal = "SIGINT", "Shutdown requested"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

fn reload(config_path: &Option<PathBuf>, config_tx: &mpsc::UnboundedSender<SiteConfig>) {
    match config_path {
        Some(path) => {
            tracing::info!(path = %path.display(), signal = "SIGHUP", "Reloading configuration");
            watcher::reload(path, config_tx);
        }
        None => tracing::info!(signal = "SIGHUP", "No configuration file to reload"),
    }
}
