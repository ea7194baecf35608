//! Client initialization.
//!
//! # Responsibilities
//! - Define how a live `ContentSource` handle is obtained (`ClientFactory`)
//! - Bound handle acquisition by the deadline (`init_client`)
//! - Pick a backend from configuration (`factory_from_config`)
//!
//! # Design Decisions
//! - Init timeout is the one place a deadline becomes a hard error: without a
//!   handle no query can run
//! - Factories are shared process-wide; handles are per request

use std::sync::Arc;

use async_trait::async_trait;

use crate::cms::git::GitFactory;
use crate::cms::memory::MemorySource;
use crate::cms::payload::PayloadFactory;
use crate::cms::source::SharedSource;
use crate::cms::types::{CmsError, CmsResult};
use crate::config::schema::{CmsBackend, CmsConfig};
use crate::resilience::{Raced, Racer};

/// Produces ready-to-query CMS handles.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Obtain a live handle. May be slow; callers bound it with `init_client`.
    async fn connect(&self) -> CmsResult<SharedSource>;

    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Obtain a client handle, failing with `CmsError::InitTimeout` if the
/// factory does not deliver within the racer's deadline.
pub async fn init_client(factory: Arc<dyn ClientFactory>, racer: &Racer) -> CmsResult<SharedSource> {
    let backend = factory.backend();
    match racer.race(async move { factory.connect().await }).await {
        Raced::Completed(Ok(source)) => {
            tracing::trace!(backend, "CMS client ready");
            Ok(source)
        }
        Raced::Completed(Err(e)) => {
            tracing::warn!(backend, error = %e, "CMS client init failed");
            Err(e)
        }
        Raced::TimedOut => {
            let ms = racer.deadline_ms();
            tracing::warn!(backend, timeout_ms = ms, "CMS client init timed out");
            Err(CmsError::InitTimeout { ms })
        }
    }
}

/// Hands out clones of one pre-built handle.
#[derive(Clone)]
pub struct StaticFactory {
    source: SharedSource,
}

impl StaticFactory {
    pub fn new(source: SharedSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ClientFactory for StaticFactory {
    async fn connect(&self) -> CmsResult<SharedSource> {
        Ok(self.source.clone())
    }

    fn backend(&self) -> &'static str {
        self.source.name()
    }
}

/// Build the factory for the configured backend.
pub fn factory_from_config(config: &CmsConfig) -> CmsResult<Arc<dyn ClientFactory>> {
    let factory: Arc<dyn ClientFactory> = match config.backend {
        CmsBackend::Payload => Arc::new(PayloadFactory::new(config)?),
        CmsBackend::Git => Arc::new(GitFactory::new(&config.content_dir)),
        CmsBackend::Memory => Arc::new(StaticFactory::new(Arc::new(MemorySource::new()))),
    };
    tracing::info!(backend = factory.backend(), "CMS backend selected");
    Ok(factory)
}
