//! The query interface every CMS backend implements.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cms::query::FindQuery;
use crate::cms::types::{CmsResult, Document, FindResult};

/// Read access to a CMS.
///
/// Both calls may fail (network, driver) or hang; callers bound them with a
/// deadline. Implementations hold no per-request state.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Query a collection.
    async fn find(&self, query: &FindQuery) -> CmsResult<FindResult>;

    /// Fetch a singleton document. `Ok(None)` when it does not exist.
    async fn find_global(&self, slug: &str) -> CmsResult<Option<Document>>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// A live, shareable client handle.
pub type SharedSource = Arc<dyn ContentSource>;
