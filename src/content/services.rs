//! Service mappers.

use crate::cms::document::{DocumentKind, ServiceDoc, SpecDoc};
use crate::cms::query::FindQuery;
use crate::cms::types::CmsResult;
use crate::content::icons::icon_name;
use crate::content::normalize::{detail_href, first_text, opt_image, text, texts, MediaResolver};
use crate::content::resolver::{contain, decode_docs, ContentResolver, ContentSettings};
use crate::content::seo::{resolve_seo, PageSeo};
use crate::content::types::{ServiceCard, ServiceDetail, ServiceLink, Spec};

const CONTENT_TYPE: &str = "services";

impl ContentResolver {
    /// All published services in display order.
    pub async fn get_services(&self) -> Vec<ServiceCard> {
        contain(CONTENT_TYPE, None, self.load_services().await)
    }

    /// One service with its detail-page fields.
    pub async fn get_service_by_slug(&self, slug: &str) -> Option<ServiceDetail> {
        contain(CONTENT_TYPE, Some(slug), self.load_service(slug).await)
    }

    async fn load_services(&self) -> CmsResult<Vec<ServiceCard>> {
        let query = FindQuery::new(DocumentKind::Service.as_str())
            .published()
            .sort("order")
            .limit(self.settings().max_docs)
            .depth(1);
        let docs = self.find(query).await?;
        let media = &self.settings().media;
        Ok(decode_docs::<ServiceDoc>(docs)
            .iter()
            .map(|doc| service_card(doc, media))
            .collect())
    }

    async fn load_service(&self, slug: &str) -> CmsResult<Option<ServiceDetail>> {
        let query = FindQuery::new(DocumentKind::Service.as_str())
            .where_equals("slug", slug)
            .published()
            .limit(1)
            .depth(1);
        let docs = self.find(query).await?;
        Ok(decode_docs::<ServiceDoc>(docs)
            .first()
            .map(|doc| service_detail(doc, self.settings())))
    }
}

pub fn service_card(doc: &ServiceDoc, media: &MediaResolver) -> ServiceCard {
    let title = text(&doc.title);
    ServiceCard {
        short_description: first_text([doc.short_description.as_deref(), doc.description.as_deref()]),
        icon_name: icon_name(&doc.slug).to_string(),
        href: detail_href(CONTENT_TYPE, &doc.slug),
        image: opt_image(&doc.image, media, &title),
        specs: doc.specs.iter().filter_map(spec).collect(),
        slug: doc.slug.clone(),
        title,
    }
}

pub fn service_detail(doc: &ServiceDoc, settings: &ContentSettings) -> ServiceDetail {
    let page = PageSeo::new(doc.meta.as_ref(), doc.title.as_deref(), doc.short_description.as_deref());
    ServiceDetail {
        card: service_card(doc, &settings.media),
        description: text(&doc.description),
        features: texts(&doc.features),
        capabilities: texts(&doc.capabilities),
        seo: resolve_seo(page, &settings.seo, &settings.media),
    }
}

/// Compact reference used on industry pages.
pub fn service_link(doc: &ServiceDoc) -> ServiceLink {
    ServiceLink {
        title: text(&doc.title),
        href: detail_href(CONTENT_TYPE, &doc.slug),
        icon_name: icon_name(&doc.slug).to_string(),
        slug: doc.slug.clone(),
    }
}

fn spec(doc: &SpecDoc) -> Option<Spec> {
    let label = first_text([doc.label.as_deref()]);
    if label.is_empty() {
        return None;
    }
    Some(Spec {
        label,
        value: text(&doc.value),
    })
}
