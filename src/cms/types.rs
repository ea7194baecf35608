//! CMS result and error types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw CMS document: an opaque bag of fields until validated.
pub type Document = serde_json::Value;

/// Response to a `find` query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindResult {
    /// Matching documents, in query order.
    #[serde(default)]
    pub docs: Vec<Document>,

    /// Total matches before `limit`, when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_docs: Option<u64>,
}

impl FindResult {
    /// The fallback value for collection queries: `{ docs: [] }`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap a list of documents.
    pub fn from_docs(docs: Vec<Document>) -> Self {
        Self {
            total_docs: Some(docs.len() as u64),
            docs,
        }
    }
}

/// Errors raised while talking to a CMS backend.
#[derive(Debug, Error)]
pub enum CmsError {
    /// The client handle could not be obtained within the deadline.
    #[error("client init timed out after {ms} ms")]
    InitTimeout { ms: u64 },

    /// The client handle could not be obtained at all.
    #[error("client init failed: {0}")]
    Init(String),

    /// Network or protocol failure talking to the CMS.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The CMS answered with a non-success status.
    #[error("CMS returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// A configured CMS URL could not be parsed.
    #[error("invalid CMS URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A response body or content file was not valid JSON.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading content from disk failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for CMS operations.
pub type CmsResult<T> = Result<T, CmsError>;
