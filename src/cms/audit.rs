//! Content audit: validate everything a backend holds against the typed shapes.
//!
//! Mappers skip invalid documents silently (apart from a log line). The audit
//! surfaces them up front, e.g. in CI before a deploy.

use futures_util::future::join_all;

use crate::cms::document::{CmsDocument, DocumentKind};
use crate::cms::query::FindQuery;
use crate::cms::source::ContentSource;
use crate::cms::types::Document;

/// Findings for one collection or global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindReport {
    pub kind: DocumentKind,
    /// Documents fetched (globals: 0 or 1).
    pub checked: usize,
    /// One message per rejected document.
    pub problems: Vec<String>,
}

impl KindReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Audit every collection and global concurrently.
pub async fn audit(source: &dyn ContentSource, max_docs: usize) -> Vec<KindReport> {
    let collections = DocumentKind::COLLECTIONS
        .iter()
        .map(|kind| audit_collection(source, *kind, max_docs));
    let globals = DocumentKind::GLOBALS.iter().map(|kind| audit_global(source, *kind));

    let (mut reports, globals) = tokio::join!(join_all(collections), join_all(globals));
    reports.extend(globals);
    reports
}

async fn audit_collection(source: &dyn ContentSource, kind: DocumentKind, max_docs: usize) -> KindReport {
    match source.find(&FindQuery::new(kind.as_str()).limit(max_docs)).await {
        Ok(found) => report(kind, found.docs),
        Err(e) => KindReport {
            kind,
            checked: 0,
            problems: vec![format!("query failed: {e}")],
        },
    }
}

async fn audit_global(source: &dyn ContentSource, kind: DocumentKind) -> KindReport {
    match source.find_global(kind.as_str()).await {
        Ok(doc) => report(kind, doc.into_iter().collect()),
        Err(e) => KindReport {
            kind,
            checked: 0,
            problems: vec![format!("query failed: {e}")],
        },
    }
}

fn report(kind: DocumentKind, docs: Vec<Document>) -> KindReport {
    let checked = docs.len();
    let problems = docs
        .into_iter()
        .enumerate()
        .filter_map(|(index, doc)| {
            let label = doc
                .get("slug")
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| format!("#{index}"));
            CmsDocument::parse(kind, doc)
                .err()
                .map(|e| format!("{label}: {e}"))
        })
        .collect();
    KindReport {
        kind,
        checked,
        problems,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::memory::MemorySource;
    use serde_json::json;

    #[tokio::test]
    async fn test_audit_reports_invalid_documents() {
        let source = MemorySource::new()
            .with_docs(
                "services",
                vec![json!({ "slug": "metrology" }), json!({ "title": "Missing slug" })],
            )
            .with_global("footer", json!({ "columns": "none" }))
            .failing("jobs");

        let reports = audit(&source, 100).await;
        assert_eq!(reports.len(), DocumentKind::COLLECTIONS.len() + DocumentKind::GLOBALS.len());

        let services = reports.iter().find(|r| r.kind == DocumentKind::Service).unwrap();
        assert_eq!(services.checked, 2);
        assert_eq!(services.problems.len(), 1);
        assert!(services.problems[0].starts_with("#1:"));

        let footer = reports.iter().find(|r| r.kind == DocumentKind::Footer).unwrap();
        assert!(!footer.is_clean());

        let jobs = reports.iter().find(|r| r.kind == DocumentKind::Job).unwrap();
        assert!(jobs.problems[0].starts_with("query failed"));

        let homepage = reports.iter().find(|r| r.kind == DocumentKind::Homepage).unwrap();
        assert_eq!(homepage.checked, 0);
        assert!(homepage.is_clean());
    }
}
