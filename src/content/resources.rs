//! Resource mappers: articles, guides, case studies, downloads.
//!
//! Resources live under a category: `/resources/<category>/<slug>`. The
//! category is stored on the document as its slug. Resources without one are
//! filed under `general`.

use crate::cms::document::{CategoryDoc, DocumentKind, MediaDoc, ResourceDoc};
use crate::cms::query::{Condition, FindQuery, Op};
use crate::cms::types::CmsResult;
use crate::content::normalize::{detail_href, first_text, media_url, opt_image, text, texts, MediaResolver};
use crate::content::resolver::{contain, decode_docs, ContentResolver, ContentSettings};
use crate::content::seo::{resolve_seo, PageSeo};
use crate::content::types::{Download, ResourceCard, ResourceDetail};

const CONTENT_TYPE: &str = "resources";

/// Category for resources the CMS has not filed anywhere.
pub const UNCATEGORIZED: &str = "general";

impl ContentResolver {
    /// All published resources, newest first.
    pub async fn get_resources(&self) -> Vec<ResourceCard> {
        contain(CONTENT_TYPE, None, self.load_resources(self.resource_query()).await)
    }

    /// Published resources in one category, newest first.
    pub async fn get_resources_by_category(&self, category: &str) -> Vec<ResourceCard> {
        let query = in_category(self.resource_query(), category);
        contain(CONTENT_TYPE, Some(category), self.load_resources(query).await)
    }

    /// Up to `limit` resources flagged as featured, newest first.
    pub async fn get_featured_resources(&self, limit: usize) -> Vec<ResourceCard> {
        let query = self
            .resource_query()
            .where_equals("featured", true)
            .limit(limit.min(self.settings().max_docs));
        contain(CONTENT_TYPE, None, self.load_resources(query).await)
    }

    /// One resource with related items from the same category.
    pub async fn get_resource(&self, category: &str, slug: &str) -> Option<ResourceDetail> {
        contain(CONTENT_TYPE, Some(slug), self.load_resource(category, slug).await)
    }

    fn resource_query(&self) -> FindQuery {
        FindQuery::new(DocumentKind::Resource.as_str())
            .published()
            .sort("-publishedDate")
            .limit(self.settings().max_docs)
            .depth(1)
    }

    async fn load_resources(&self, query: FindQuery) -> CmsResult<Vec<ResourceCard>> {
        let docs = self.find(query).await?;
        let media = &self.settings().media;
        Ok(decode_docs::<ResourceDoc>(docs)
            .iter()
            .map(|doc| resource_card(doc, media))
            .collect())
    }

    async fn load_resource(&self, category: &str, slug: &str) -> CmsResult<Option<ResourceDetail>> {
        let resource = FindQuery::new(DocumentKind::Resource.as_str())
            .where_equals("slug", slug)
            .published()
            .limit(1)
            .depth(1);
        let related = in_category(self.resource_query(), category)
            .filter("slug", Op::NotEquals, slug)
            .limit(self.settings().related_limit);

        let (resource, related) = tokio::join!(self.find(resource), self.find(related));

        let Some(doc) = decode_docs::<ResourceDoc>(resource?)
            .into_iter()
            .find(|doc| category_slug(doc) == category)
        else {
            return Ok(None);
        };
        let related = contain(CONTENT_TYPE, Some(slug), related);
        let media = &self.settings().media;
        let related: Vec<ResourceCard> = decode_docs::<ResourceDoc>(related)
            .iter()
            .map(|doc| resource_card(doc, media))
            .collect();

        Ok(Some(resource_detail(&doc, related, self.settings())))
    }
}

fn in_category(query: FindQuery, category: &str) -> FindQuery {
    if category == UNCATEGORIZED {
        query.filter("category", Op::Exists, false)
    } else {
        // Stored either as a bare slug or as a populated relation.
        query.any_of([
            Condition::new("category", Op::Equals, category),
            Condition::new("category.slug", Op::Equals, category),
        ])
    }
}

/// Category slug of a resource, `general` when absent.
pub fn category_slug(doc: &ResourceDoc) -> String {
    doc.category
        .as_ref()
        .and_then(CategoryDoc::slug)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNCATEGORIZED)
        .to_string()
}

/// Display label: the category's own title, else the slug in title case.
fn category_label(doc: &ResourceDoc, slug: &str) -> String {
    let label = first_text([doc.category.as_ref().and_then(CategoryDoc::label)]);
    if !label.is_empty() {
        return label;
    }
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn resource_card(doc: &ResourceDoc, media: &MediaResolver) -> ResourceCard {
    let title = text(&doc.title);
    let category = category_slug(doc);
    ResourceCard {
        category_label: category_label(doc, &category),
        excerpt: first_text([doc.excerpt.as_deref(), doc.description.as_deref()]),
        href: detail_href(&format!("{CONTENT_TYPE}/{category}"), &doc.slug),
        image: opt_image(&doc.image, media, &title),
        published_date: doc.published_date.clone(),
        read_time: doc.read_time,
        tags: texts(&doc.tags),
        featured: doc.featured.unwrap_or(false),
        slug: doc.slug.clone(),
        category,
        title,
    }
}

pub fn resource_detail(
    doc: &ResourceDoc,
    related: Vec<ResourceCard>,
    settings: &ContentSettings,
) -> ResourceDetail {
    let page = PageSeo::new(doc.meta.as_ref(), doc.title.as_deref(), doc.excerpt.as_deref());
    ResourceDetail {
        card: resource_card(doc, &settings.media),
        author: text(&doc.author),
        body: doc.content.clone(),
        download: doc.download.as_ref().and_then(|d| download(d, &settings.media)),
        related,
        seo: resolve_seo(page, &settings.seo, &settings.media),
    }
}

fn download(doc: &MediaDoc, media: &MediaResolver) -> Option<Download> {
    let url = media_url(doc, media)?;
    let stored = match doc {
        MediaDoc::Populated(object) => object.filename.as_deref(),
        _ => None,
    };
    let from_url = url.rsplit('/').next().map(|s| s.split('?').next().unwrap_or(s));
    Some(Download {
        filename: first_text([stored, from_url]),
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::document::parse_document;
    use crate::cms::memory::MemorySource;
    use crate::content::resolver::test_support::memory_site;
    use serde_json::json;

    fn library() -> MemorySource {
        MemorySource::new().with_docs(
            "resources",
            vec![
                json!({
                    "title": "GD&T Basics",
                    "slug": "gdt-basics",
                    "category": "guides",
                    "publishedDate": "2024-03-01",
                    "featured": true,
                    "content": { "root": { "children": [] } },
                    "download": { "url": "/media/gdt.pdf", "filename": "gdt-basics.pdf" }
                }),
                json!({
                    "title": "Titanium Tips",
                    "slug": "titanium-tips",
                    "category": "guides",
                    "publishedDate": "2024-05-01"
                }),
                json!({
                    "title": "Turbine Blade Case Study",
                    "slug": "turbine-blades",
                    "category": { "slug": "case-studies", "title": "Case Studies" },
                    "publishedDate": "2024-04-01",
                    "featured": true
                }),
                json!({ "title": "Company News", "slug": "news", "publishedDate": "2023-01-01" }),
            ],
        )
    }

    #[tokio::test]
    async fn test_resources_newest_first() {
        let cards = memory_site(library()).resolver().get_resources().await;
        let slugs: Vec<_> = cards.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["titanium-tips", "turbine-blades", "gdt-basics", "news"]);
        assert_eq!(cards[1].href, "/resources/case-studies/turbine-blades");
        assert_eq!(cards[1].category_label, "Case Studies");
        assert_eq!(cards[3].href, "/resources/general/news");
    }

    #[tokio::test]
    async fn test_resources_by_category() {
        let resolver = memory_site(library()).resolver();
        let guides = resolver.get_resources_by_category("guides").await;
        assert_eq!(guides.len(), 2);
        assert!(guides.iter().all(|c| c.category == "guides"));
        assert_eq!(guides[0].category_label, "Guides");

        let general = resolver.get_resources_by_category(UNCATEGORIZED).await;
        assert_eq!(general.len(), 1);
        assert_eq!(general[0].slug, "news");
    }

    #[tokio::test]
    async fn test_populated_category_lists_and_relates() {
        let case_study = |slug: &str, date: &str| {
            json!({
                "title": slug,
                "slug": slug,
                "category": { "id": 7, "slug": "case-studies", "title": "Case Studies" },
                "publishedDate": date
            })
        };
        let source = MemorySource::new().with_docs(
            "resources",
            vec![
                case_study("turbine-blades", "2024-04-01"),
                case_study("aluminum-housings", "2024-02-01"),
                json!({ "title": "Titanium Tips", "slug": "titanium-tips", "category": "guides" }),
            ],
        );
        let resolver = memory_site(source).resolver();

        let listed: Vec<_> = resolver
            .get_resources_by_category("case-studies")
            .await
            .into_iter()
            .map(|c| c.slug)
            .collect();
        assert_eq!(listed, vec!["turbine-blades", "aluminum-housings"]);

        let detail = resolver.get_resource("case-studies", "turbine-blades").await.unwrap();
        let related: Vec<_> = detail.related.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(related, vec!["aluminum-housings"]);
        assert_eq!(resolver.get_all_resource_paths().await.len(), 3);
    }

    #[tokio::test]
    async fn test_featured_resources_respect_limit() {
        let resolver = memory_site(library()).resolver();
        let featured = resolver.get_featured_resources(1).await;
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].slug, "turbine-blades");
        assert!(featured[0].featured);
    }

    #[tokio::test]
    async fn test_resource_detail_with_related() {
        let detail = memory_site(library())
            .resolver()
            .get_resource("guides", "gdt-basics")
            .await
            .unwrap();
        assert_eq!(detail.card.href, "/resources/guides/gdt-basics");
        assert_eq!(detail.body, json!({ "root": { "children": [] } }));
        assert_eq!(
            detail.download,
            Some(Download {
                url: "/media/gdt.pdf".into(),
                filename: "gdt-basics.pdf".into()
            })
        );
        let related: Vec<_> = detail.related.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(related, vec!["titanium-tips"]);
    }

    #[tokio::test]
    async fn test_resource_in_wrong_category_is_none() {
        let resolver = memory_site(library()).resolver();
        assert!(resolver.get_resource("case-studies", "gdt-basics").await.is_none());
        assert!(resolver.get_resource("case-studies", "turbine-blades").await.is_some());
        assert!(resolver.get_resource(UNCATEGORIZED, "news").await.is_some());
    }

    #[tokio::test]
    async fn test_failing_resources_yield_empty() {
        let resolver = memory_site(MemorySource::new().failing("resources")).resolver();
        assert!(resolver.get_resources().await.is_empty());
        assert!(resolver.get_resource("guides", "gdt-basics").await.is_none());
    }

    #[test]
    fn test_card_totality() {
        let doc: ResourceDoc = parse_document(json!({ "slug": "orphan" })).unwrap();
        let card = resource_card(&doc, &MediaResolver::default());
        assert_eq!(card.category, "general");
        assert_eq!(card.category_label, "General");
        assert!(card.tags.is_empty());
        assert!(!card.featured);
        assert_eq!(card.read_time, None);
    }

    #[test]
    fn test_download_filename_from_url() {
        let doc = MediaDoc::Url("/media/spec-sheet.pdf?v=2".into());
        let d = download(&doc, &MediaResolver::default()).unwrap();
        assert_eq!(d.filename, "spec-sheet.pdf");
    }
}
