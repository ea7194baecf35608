//! Git-based CMS content read from a working-tree checkout.
//!
//! # Layout
//! ```text
//! <content_dir>/
//!     services/5-axis-machining.json
//!     resources/tolerance-guide.json
//!     globals/homepage.json
//! ```
//!
//! # Design Decisions
//! - One JSON file per document; the file stem is the slug when the document
//!   has none
//! - Queries are evaluated in-process with `FindQuery::apply`
//! - A broken file is skipped with a warning so one bad commit cannot blank
//!   a whole collection

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::cms::init::ClientFactory;
use crate::cms::query::FindQuery;
use crate::cms::source::{ContentSource, SharedSource};
use crate::cms::types::{CmsError, CmsResult, Document, FindResult};

const GLOBALS_DIR: &str = "globals";

/// Reads documents from a content directory.
#[derive(Debug, Clone)]
pub struct GitSource {
    root: PathBuf,
}

impl GitSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn read_collection(&self, collection: &str) -> CmsResult<Vec<Document>> {
        let dir = self.root.join(collection);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(CmsError::Io { path: dir, source }),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| CmsError::Io { path: dir.clone(), source })?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent.
        paths.sort();

        let mut docs = Vec::with_capacity(paths.len());
        for path in paths {
            match read_document(&path).await {
                Ok(doc) => docs.push(doc),
                Err(e) => {
                    tracing::warn!(collection, path = %path.display(), error = %e, "Skipping unreadable content file");
                }
            }
        }
        Ok(docs)
    }
}

#[async_trait]
impl ContentSource for GitSource {
    async fn find(&self, query: &FindQuery) -> CmsResult<FindResult> {
        let docs = self.read_collection(&query.collection).await?;
        Ok(FindResult::from_docs(query.apply(docs)))
    }

    async fn find_global(&self, slug: &str) -> CmsResult<Option<Document>> {
        let path = self.root.join(GLOBALS_DIR).join(format!("{slug}.json"));
        match tokio::fs::metadata(&path).await {
            Ok(_) => read_document(&path).await.map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CmsError::Io { path, source }),
        }
    }

    fn name(&self) -> &'static str {
        "git"
    }
}

async fn read_document(path: &Path) -> CmsResult<Document> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CmsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut doc: Value = serde_json::from_slice(&bytes)?;

    if let (Value::Object(fields), Some(stem)) = (&mut doc, path.file_stem().and_then(|s| s.to_str())) {
        fields
            .entry("slug")
            .or_insert_with(|| Value::String(stem.to_string()));
    }
    Ok(doc)
}

/// Opens the content directory, failing if it is missing.
#[derive(Debug, Clone)]
pub struct GitFactory {
    root: PathBuf,
}

impl GitFactory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ClientFactory for GitFactory {
    async fn connect(&self) -> CmsResult<SharedSource> {
        let meta = tokio::fs::metadata(&self.root)
            .await
            .map_err(|source| CmsError::Io {
                path: self.root.clone(),
                source,
            })?;
        if !meta.is_dir() {
            return Err(CmsError::Init(format!(
                "content path {} is not a directory",
                self.root.display()
            )));
        }
        Ok(Arc::new(GitSource::new(self.root.clone())))
    }

    fn backend(&self) -> &'static str {
        "git"
    }
}
