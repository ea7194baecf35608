//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all content handlers
//! - Wire up middleware (tracing, timeout, request ID, metrics)
//! - Bind server to listener
//! - Swap in a rebuilt `Site` when configuration changes
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::routing::get;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::schema::SiteConfig;
use crate::content::{ContentResolver, Site};
use crate::http::handlers;
use crate::http::request::{request_id, track_metrics, UuidRequestId, X_REQUEST_ID};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<ArcSwap<Site>>,
}

impl AppState {
    pub fn new(site: Site) -> Self {
        Self {
            site: Arc::new(ArcSwap::from_pointee(site)),
        }
    }

    /// A resolver bound to the current site snapshot.
    pub fn resolver(&self) -> ContentResolver {
        self.site.load().resolver()
    }
}

/// HTTP server for the content API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &SiteConfig, site: Site) -> Self {
        let state = AppState::new(site);
        let router = Self::build_router(config, state.clone());
        Self { router, state }
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &SiteConfig, state: AppState) -> Router {
        let header = HeaderName::from_static(X_REQUEST_ID);
        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/services", get(handlers::services))
            .route("/api/services/{slug}", get(handlers::service))
            .route("/api/industries", get(handlers::industries))
            .route("/api/industries/{slug}", get(handlers::industry))
            .route("/api/resources", get(handlers::resources))
            .route("/api/resources/featured", get(handlers::featured_resources))
            .route("/api/resources/{category}", get(handlers::resources_in_category))
            .route("/api/resources/{category}/{slug}", get(handlers::resource))
            .route("/api/paths/{kind}", get(handlers::paths))
            .route("/api/pages/{name}", get(handlers::page))
            .fallback(|| async { handlers::not_found() })
            .with_state(state)
            .layer(middleware::from_fn(track_metrics))
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::new(header.clone()))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::new(header, UuidRequestId))
    }

    /// Run the server until the shutdown broadcast fires.
    ///
    /// Configurations received on `config_updates` rebuild the `Site`; requests
    /// already in flight finish against the snapshot they started with.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<SiteConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = self.state.site.load().backend(),
            "HTTP server starting"
        );

        let site = self.state.site.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_config(&site, &config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Rebuild the site from `config` and publish it. Keeps the old site on error.
pub fn apply_config(site: &ArcSwap<Site>, config: &SiteConfig) -> bool {
    match Site::from_config(config) {
        Ok(next) => {
            tracing::info!(
                backend = next.backend(),
                timeout_ms = config.cms.timeout_ms,
                "Content configuration reloaded"
            );
            site.store(Arc::new(next));
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected reloaded configuration; keeping current site");
            false
        }
    }
}
