//! Identity-only queries for static path enumeration.
//!
//! Any failure or timeout yields an empty list: a build with no pre-rendered
//! detail pages still renders them on demand.

use crate::cms::document::{CategoryDoc, DocumentKind};
use crate::cms::query::FindQuery;
use crate::cms::types::{CmsResult, Document};
use crate::content::resolver::{contain, ContentResolver};
use crate::content::resources::UNCATEGORIZED;
use crate::content::types::ResourcePath;

impl ContentResolver {
    pub async fn get_all_service_slugs(&self) -> Vec<String> {
        let result = self.load_identities(DocumentKind::Service, &["slug"]).await;
        contain("service slugs", None, result.map(slugs))
    }

    pub async fn get_all_industry_slugs(&self) -> Vec<String> {
        let result = self.load_identities(DocumentKind::Industry, &["slug"]).await;
        contain("industry slugs", None, result.map(slugs))
    }

    pub async fn get_all_resource_paths(&self) -> Vec<ResourcePath> {
        let result = self
            .load_identities(DocumentKind::Resource, &["slug", "category"])
            .await;
        contain(
            "resource paths",
            None,
            result.map(|docs| docs.iter().filter_map(resource_path).collect()),
        )
    }

    async fn load_identities(&self, kind: DocumentKind, fields: &[&str]) -> CmsResult<Vec<Document>> {
        let query = FindQuery::new(kind.as_str())
            .published()
            .select(fields.iter().copied())
            .limit(self.settings().max_docs)
            .depth(0);
        self.find(query).await
    }
}

fn slug_of(doc: &Document) -> Option<&str> {
    doc.get("slug")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn slugs(docs: Vec<Document>) -> Vec<String> {
    docs.iter().filter_map(slug_of).map(String::from).collect()
}

fn resource_path(doc: &Document) -> Option<ResourcePath> {
    let slug = slug_of(doc)?;
    let category = doc
        .get("category")
        .and_then(|raw| serde_json::from_value::<CategoryDoc>(raw.clone()).ok())
        .as_ref()
        .and_then(CategoryDoc::slug)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNCATEGORIZED)
        .to_string();
    Some(ResourcePath {
        category,
        slug: slug.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::memory::MemorySource;
    use crate::content::resolver::test_support::memory_site;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_service_slugs_skip_missing() {
        let source = MemorySource::new().with_docs(
            "services",
            vec![
                json!({ "slug": "5-axis-machining", "title": "5-Axis" }),
                json!({ "title": "No slug" }),
                json!({ "slug": "" }),
                json!({ "slug": "metrology" }),
            ],
        );
        let slugs = memory_site(source).resolver().get_all_service_slugs().await;
        assert_eq!(slugs, vec!["5-axis-machining", "metrology"]);
    }

    #[tokio::test]
    async fn test_resource_paths() {
        let source = MemorySource::new().with_docs(
            "resources",
            vec![
                json!({ "slug": "gdt-basics", "category": "guides" }),
                json!({ "slug": "turbine-blades", "category": { "slug": "case-studies" } }),
                json!({ "slug": "news" }),
            ],
        );
        let paths = memory_site(source).resolver().get_all_resource_paths().await;
        assert_eq!(
            paths,
            vec![
                ResourcePath { category: "guides".into(), slug: "gdt-basics".into() },
                ResourcePath { category: "case-studies".into(), slug: "turbine-blades".into() },
                ResourcePath { category: "general".into(), slug: "news".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_yields_empty() {
        let source = MemorySource::new().failing("industries");
        assert!(memory_site(source).resolver().get_all_industry_slugs().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_empty() {
        let source = MemorySource::new()
            .with_docs("resources", vec![json!({ "slug": "a", "category": "guides" })])
            .with_latency(Duration::from_secs(10));
        assert!(memory_site(source).resolver().get_all_resource_paths().await.is_empty());
    }
}
