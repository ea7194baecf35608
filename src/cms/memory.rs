//! In-process content source.
//!
//! Serves documents held in memory. Used for local preview and tests, with
//! optional artificial latency and failure injection to exercise the
//! deadline and error paths.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::cms::query::FindQuery;
use crate::cms::source::ContentSource;
use crate::cms::types::{CmsError, CmsResult, Document, FindResult};

/// Documents keyed by collection and global slug.
#[derive(Debug, Default)]
pub struct MemorySource {
    collections: HashMap<String, Vec<Document>>,
    globals: HashMap<String, Document>,
    latency: Option<Duration>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add documents to a collection.
    pub fn with_docs(mut self, collection: &str, docs: Vec<Document>) -> Self {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
        self
    }

    /// Set a global document.
    pub fn with_global(mut self, slug: &str, doc: Document) -> Self {
        self.globals.insert(slug.to_string(), doc);
        self
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make calls for a collection or global slug fail.
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Number of `find` and `find_global` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self, name: &str) -> CmsResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing.contains(name) {
            return Err(CmsError::Backend(format!("injected failure for '{name}'")));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn find(&self, query: &FindQuery) -> CmsResult<FindResult> {
        self.enter(&query.collection).await?;
        let docs = self
            .collections
            .get(&query.collection)
            .cloned()
            .unwrap_or_default();
        Ok(FindResult::from_docs(query.apply(docs)))
    }

    async fn find_global(&self, slug: &str) -> CmsResult<Option<Document>> {
        self.enter(slug).await?;
        Ok(self.globals.get(slug).cloned())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
