//! Industry mappers.
//!
//! An industry page lists the services that apply to it. Editors pick them
//! through the industry's `relatedServices` relationship; when that is empty
//! or unpopulated, services tagged with the industry are used instead. Both
//! queries run concurrently.

use crate::cms::document::{DocumentKind, IndustryDoc, RelationDoc, ServiceDoc};
use crate::cms::query::FindQuery;
use crate::cms::types::CmsResult;
use crate::content::icons::icon_name;
use crate::content::normalize::{detail_href, first_text, opt_image, text, texts, MediaResolver};
use crate::content::resolver::{contain, decode_docs, ContentResolver, ContentSettings};
use crate::content::seo::{resolve_seo, PageSeo};
use crate::content::services::service_link;
use crate::content::types::{IndustryCard, IndustryDetail, ServiceLink};

const CONTENT_TYPE: &str = "industries";

impl ContentResolver {
    /// All published industries in display order.
    pub async fn get_industries(&self) -> Vec<IndustryCard> {
        contain(CONTENT_TYPE, None, self.load_industries().await)
    }

    /// One industry with its related services.
    pub async fn get_industry_by_slug(&self, slug: &str) -> Option<IndustryDetail> {
        contain(CONTENT_TYPE, Some(slug), self.load_industry(slug).await)
    }

    async fn load_industries(&self) -> CmsResult<Vec<IndustryCard>> {
        let query = FindQuery::new(DocumentKind::Industry.as_str())
            .published()
            .sort("order")
            .limit(self.settings().max_docs)
            .depth(1);
        let docs = self.find(query).await?;
        let media = &self.settings().media;
        Ok(decode_docs::<IndustryDoc>(docs)
            .iter()
            .map(|doc| industry_card(doc, media))
            .collect())
    }

    async fn load_industry(&self, slug: &str) -> CmsResult<Option<IndustryDetail>> {
        let industry = FindQuery::new(DocumentKind::Industry.as_str())
            .where_equals("slug", slug)
            .published()
            .limit(1)
            .depth(1);
        let tagged = FindQuery::new(DocumentKind::Service.as_str())
            .where_equals("industries.slug", slug)
            .published()
            .sort("order")
            .limit(self.settings().max_docs);

        let (industry, tagged) = tokio::join!(self.find(industry), self.find(tagged));

        let Some(doc) = decode_docs::<IndustryDoc>(industry?).into_iter().next() else {
            return Ok(None);
        };
        let tagged: Vec<ServiceLink> = decode_docs::<ServiceDoc>(contain("services", Some(slug), tagged))
            .iter()
            .map(service_link)
            .collect();

        Ok(Some(industry_detail(&doc, tagged, self.settings())))
    }
}

pub fn industry_card(doc: &IndustryDoc, media: &MediaResolver) -> IndustryCard {
    let title = text(&doc.title);
    IndustryCard {
        short_description: first_text([doc.short_description.as_deref(), doc.description.as_deref()]),
        icon_name: icon_name(&doc.slug).to_string(),
        href: detail_href(CONTENT_TYPE, &doc.slug),
        image: opt_image(&doc.image, media, &title),
        slug: doc.slug.clone(),
        title,
    }
}

/// Build the detail view. `tagged` is used only when the industry has no
/// populated related services of its own.
pub fn industry_detail(
    doc: &IndustryDoc,
    tagged: Vec<ServiceLink>,
    settings: &ContentSettings,
) -> IndustryDetail {
    let related = related_services(&doc.related_services);
    let page = PageSeo::new(doc.meta.as_ref(), doc.title.as_deref(), doc.short_description.as_deref());
    IndustryDetail {
        card: industry_card(doc, &settings.media),
        description: text(&doc.description),
        challenges: texts(&doc.challenges),
        capabilities: texts(&doc.capabilities),
        certifications: texts(&doc.certifications),
        related_services: if related.is_empty() { tagged } else { related },
        seo: resolve_seo(page, &settings.seo, &settings.media),
    }
}

/// Populated relations that carry a slug; bare ids are dropped.
fn related_services(relations: &[RelationDoc]) -> Vec<ServiceLink> {
    relations
        .iter()
        .filter_map(|relation| match relation {
            RelationDoc::Populated(doc) => {
                let slug = doc.slug.as_deref().filter(|s| !s.trim().is_empty())?;
                Some(ServiceLink {
                    title: first_text([doc.title.as_deref(), doc.name.as_deref()]),
                    slug: slug.to_string(),
                    href: detail_href("services", slug),
                    icon_name: icon_name(slug).to_string(),
                })
            }
            RelationDoc::Id(_) => None,
        })
        .collect()
}
