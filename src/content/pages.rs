//! Standalone pages backed by globals: about, contact, careers, terms,
//! supplier requirements.

use crate::cms::document::{
    AboutDoc, CardDoc, CareersDoc, ContactDoc, DocumentKind, JobDoc, SectionDoc,
    SupplierRequirementsDoc, TermsDoc,
};
use crate::cms::query::FindQuery;
use crate::content::icons::icon_name;
use crate::content::normalize::{detail_href, first_text, media_url, opt_image, text, texts};
use crate::content::resolver::{contain, decode_docs, ContentResolver, ContentSettings};
use crate::content::seo::{resolve_seo, PageSeo};
use crate::content::site::stats;
use crate::content::types::{
    AboutPage, CareersPage, ContactInfo, ContactPage, Department, DocumentLink, Feature, JobListing,
    Milestone, OfficeHours, RequirementSection, SupplierRequirementsPage, TeamMember, TermsPage,
    TextSection,
};

/// Job postings visible on the careers page.
const OPEN_STATUS: &str = "open";

impl ContentResolver {
    pub async fn get_about(&self) -> Option<AboutPage> {
        let result = self.load_global::<AboutDoc>().await;
        contain(
            DocumentKind::About.as_str(),
            None,
            result.map(|doc| doc.map(|d| about_page(&d, self.settings()))),
        )
    }

    pub async fn get_contact(&self) -> Option<ContactPage> {
        let result = self.load_global::<ContactDoc>().await;
        contain(
            DocumentKind::Contact.as_str(),
            None,
            result.map(|doc| doc.map(|d| contact_page(&d, self.settings()))),
        )
    }

    /// Careers page with open positions. The global and the job list are
    /// fetched concurrently; a failed job query leaves the list empty.
    pub async fn get_careers(&self) -> Option<CareersPage> {
        let jobs = FindQuery::new(DocumentKind::Job.as_str())
            .where_equals("status", OPEN_STATUS)
            .published()
            .sort("title")
            .limit(self.settings().max_docs);

        let (page, jobs) = tokio::join!(self.load_global::<CareersDoc>(), self.find(jobs));

        let jobs: Vec<JobListing> =
            decode_docs::<JobDoc>(contain(DocumentKind::Job.as_str(), None, jobs))
                .iter()
                .map(job_listing)
                .collect();
        contain(
            DocumentKind::Careers.as_str(),
            None,
            page.map(|doc| doc.map(|d| careers_page(&d, jobs, self.settings()))),
        )
    }

    pub async fn get_terms(&self) -> Option<TermsPage> {
        let result = self.load_global::<TermsDoc>().await;
        contain(
            DocumentKind::Terms.as_str(),
            None,
            result.map(|doc| doc.map(|d| terms_page(&d, self.settings()))),
        )
    }

    pub async fn get_supplier_requirements(&self) -> Option<SupplierRequirementsPage> {
        let result = self.load_global::<SupplierRequirementsDoc>().await;
        contain(
            DocumentKind::SupplierRequirements.as_str(),
            None,
            result.map(|doc| doc.map(|d| supplier_requirements_page(&d, self.settings()))),
        )
    }
}

fn sections(docs: &[SectionDoc]) -> Vec<TextSection> {
    docs.iter()
        .map(|s| TextSection {
            heading: first_text([s.heading.as_deref(), s.title.as_deref()]),
            body: first_text([s.body.as_deref(), s.content.as_deref()]),
        })
        .filter(|s| !(s.heading.is_empty() && s.body.is_empty()))
        .collect()
}

/// Cards carry an icon name from the CMS when set, else one looked up by title.
fn features(docs: &[CardDoc]) -> Vec<Feature> {
    docs.iter()
        .filter_map(|card| {
            let title = first_text([card.title.as_deref()]);
            if title.is_empty() {
                return None;
            }
            let lookup = icon_name(&title.to_lowercase().replace(' ', "-"));
            Some(Feature {
                description: text(&card.description),
                icon_name: first_text([card.icon.as_deref(), Some(lookup)]),
                title,
            })
        })
        .collect()
}

pub fn about_page(doc: &AboutDoc, settings: &ContentSettings) -> AboutPage {
    let title = text(&doc.title);
    let page = PageSeo::new(doc.meta.as_ref(), doc.title.as_deref(), doc.description.as_deref());
    AboutPage {
        description: text(&doc.description),
        image: opt_image(&doc.image, &settings.media, &title),
        sections: sections(&doc.sections),
        values: features(&doc.values),
        team: doc
            .team
            .iter()
            .filter_map(|member| {
                let name = first_text([member.name.as_deref()]);
                (!name.is_empty()).then(|| TeamMember {
                    role: text(&member.role),
                    bio: text(&member.bio),
                    photo: opt_image(&member.photo, &settings.media, &name),
                    name,
                })
            })
            .collect(),
        stats: stats(&doc.stats),
        timeline: doc
            .timeline
            .iter()
            .map(|m| Milestone {
                year: text(&m.year),
                title: text(&m.title),
                description: text(&m.description),
            })
            .collect(),
        seo: resolve_seo(page, &settings.seo, &settings.media),
        title,
    }
}

pub fn contact_page(doc: &ContactDoc, settings: &ContentSettings) -> ContactPage {
    let page = PageSeo::new(doc.meta.as_ref(), doc.title.as_deref(), doc.description.as_deref());
    ContactPage {
        title: text(&doc.title),
        description: text(&doc.description),
        contact: ContactInfo {
            address: text(&doc.address),
            phone: text(&doc.phone),
            email: text(&doc.email),
        },
        hours: doc
            .hours
            .iter()
            .map(|h| OfficeHours {
                days: text(&h.days),
                hours: text(&h.hours),
            })
            .collect(),
        departments: doc
            .departments
            .iter()
            .map(|d| Department {
                name: text(&d.name),
                email: text(&d.email),
                phone: text(&d.phone),
            })
            .collect(),
        map_embed_url: doc
            .map_embed_url
            .clone()
            .filter(|url| url.starts_with("https://")),
        seo: resolve_seo(page, &settings.seo, &settings.media),
    }
}

pub fn job_listing(doc: &JobDoc) -> JobListing {
    JobListing {
        title: text(&doc.title),
        department: text(&doc.department),
        location: text(&doc.location),
        employment_type: text(&doc.employment_type),
        summary: first_text([doc.summary.as_deref(), doc.description.as_deref()]),
        requirements: texts(&doc.requirements),
        href: detail_href("careers", &doc.slug),
        slug: doc.slug.clone(),
    }
}

pub fn careers_page(doc: &CareersDoc, jobs: Vec<JobListing>, settings: &ContentSettings) -> CareersPage {
    let title = text(&doc.title);
    let page = PageSeo::new(doc.meta.as_ref(), doc.title.as_deref(), doc.description.as_deref());
    CareersPage {
        description: text(&doc.description),
        image: opt_image(&doc.image, &settings.media, &title),
        culture: text(&doc.culture),
        benefits: features(&doc.benefits),
        jobs,
        seo: resolve_seo(page, &settings.seo, &settings.media),
        title,
    }
}

pub fn terms_page(doc: &TermsDoc, settings: &ContentSettings) -> TermsPage {
    let page = PageSeo::new(doc.meta.as_ref(), doc.title.as_deref(), None);
    TermsPage {
        title: text(&doc.title),
        last_updated: doc.last_updated.clone(),
        sections: sections(&doc.sections),
        seo: resolve_seo(page, &settings.seo, &settings.media),
    }
}

pub fn supplier_requirements_page(
    doc: &SupplierRequirementsDoc,
    settings: &ContentSettings,
) -> SupplierRequirementsPage {
    let page = PageSeo::new(doc.meta.as_ref(), doc.title.as_deref(), doc.description.as_deref());
    SupplierRequirementsPage {
        title: text(&doc.title),
        description: text(&doc.description),
        requirements: doc
            .requirements
            .iter()
            .map(|r| RequirementSection {
                title: text(&r.title),
                description: text(&r.description),
                items: texts(&r.items),
            })
            .collect(),
        documents: doc
            .documents
            .iter()
            .filter_map(|d| {
                let url = d.file.as_ref().and_then(|f| media_url(f, &settings.media))?;
                Some(DocumentLink {
                    title: text(&d.title),
                    url,
                })
            })
            .collect(),
        contact_email: text(&doc.contact_email),
        seo: resolve_seo(page, &settings.seo, &settings.media),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::memory::MemorySource;
    use crate::content::resolver::test_support::memory_site;
    use crate::content::seo::DEFAULT_TITLE;
    use serde_json::json;
    use std::time::Duration;

    fn jobs() -> Vec<serde_json::Value> {
        vec![
            json!({ "title": "CNC Machinist", "slug": "cnc-machinist", "status": "open", "requirements": ["5 years 5-axis"] }),
            json!({ "title": "Quality Engineer", "slug": "quality-engineer", "status": "closed" }),
            json!({ "title": "CMM Programmer", "slug": "cmm-programmer", "status": "open" }),
        ]
    }

    #[tokio::test]
    async fn test_careers_with_open_jobs() {
        let source = MemorySource::new()
            .with_global(
                "careers",
                json!({ "title": "Careers", "benefits": [{ "title": "Quality" }, { "description": "untitled" }] }),
            )
            .with_docs("jobs", jobs());
        let careers = memory_site(source).resolver().get_careers().await.unwrap();

        let slugs: Vec<_> = careers.jobs.iter().map(|j| j.slug.as_str()).collect();
        assert_eq!(slugs, vec!["cmm-programmer", "cnc-machinist"]);
        assert_eq!(careers.jobs[1].href, "/careers/cnc-machinist");
        assert_eq!(careers.benefits.len(), 1);
        assert_eq!(careers.benefits[0].icon_name, "BadgeCheck");
        assert_eq!(careers.seo.meta_title, "Careers");
    }

    #[tokio::test]
    async fn test_careers_survives_job_failure() {
        let source = MemorySource::new()
            .with_global("careers", json!({ "title": "Careers" }))
            .failing("jobs");
        let careers = memory_site(source).resolver().get_careers().await.unwrap();
        assert!(careers.jobs.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_globals_are_none() {
        let source = MemorySource::new()
            .with_global("about", json!({ "title": "About" }))
            .with_latency(Duration::from_millis(4500));
        assert!(memory_site(source).resolver().get_about().await.is_none());
    }

    #[tokio::test]
    async fn test_about_page() {
        let source = MemorySource::new().with_global(
            "about",
            json!({
                "title": "About IIS",
                "sections": [{ "title": "History", "content": "Founded in 1994." }, {}],
                "values": [{ "title": "Precision", "description": "Every micron" }],
                "team": [{ "name": "Dana Ortiz", "role": "President" }, { "role": "Vacant" }],
                "timeline": [{ "year": "1994", "title": "Founded" }]
            }),
        );
        let about = memory_site(source).resolver().get_about().await.unwrap();

        assert_eq!(about.sections, vec![TextSection { heading: "History".into(), body: "Founded in 1994.".into() }]);
        assert_eq!(about.values[0].icon_name, "Crosshair");
        assert_eq!(about.team.len(), 1);
        assert_eq!(about.timeline[0].year, "1994");
        assert_eq!(about.seo.twitter_title, "About IIS");
    }

    #[tokio::test]
    async fn test_contact_and_terms() {
        let source = MemorySource::new()
            .with_global(
                "contact",
                json!({
                    "phone": "+1 555 0100",
                    "hours": [{ "days": "Mon-Fri", "hours": "7am-5pm" }],
                    "mapEmbedUrl": "javascript:alert(1)"
                }),
            )
            .with_global("terms", json!({ "title": "Terms", "lastUpdated": "2024-01-15" }));
        let resolver = memory_site(source).resolver();

        let contact = resolver.get_contact().await.unwrap();
        assert_eq!(contact.contact.phone, "+1 555 0100");
        assert_eq!(contact.hours.len(), 1);
        assert_eq!(contact.map_embed_url, None);
        assert_eq!(contact.seo.meta_title, DEFAULT_TITLE);

        let terms = resolver.get_terms().await.unwrap();
        assert_eq!(terms.last_updated.as_deref(), Some("2024-01-15"));
        assert!(terms.sections.is_empty());
    }

    #[tokio::test]
    async fn test_supplier_requirements() {
        let source = MemorySource::new().with_global(
            "supplier-requirements",
            json!({
                "title": "Supplier Requirements",
                "requirements": [{ "title": "Quality", "items": ["AS9100 or ISO 9001", { "item": "First article inspection" }] }],
                "documents": [
                    { "title": "Quality Clauses", "file": { "url": "/media/qc.pdf" } },
                    { "title": "Unpopulated", "file": "65f1c0ffee" }
                ],
                "contactEmail": "purchasing@example.com"
            }),
        );
        let page = memory_site(source)
            .resolver()
            .get_supplier_requirements()
            .await
            .unwrap();

        assert_eq!(page.requirements[0].items.len(), 2);
        assert_eq!(page.documents, vec![DocumentLink { title: "Quality Clauses".into(), url: "/media/qc.pdf".into() }]);
        assert_eq!(page.contact_email, "purchasing@example.com");
    }

    #[tokio::test]
    async fn test_failing_pages_are_none() {
        let source = MemorySource::new()
            .failing("about")
            .failing("contact")
            .failing("careers")
            .failing("terms")
            .failing("supplier-requirements");
        let resolver = memory_site(source).resolver();
        assert!(resolver.get_about().await.is_none());
        assert!(resolver.get_contact().await.is_none());
        assert!(resolver.get_careers().await.is_none());
        assert!(resolver.get_terms().await.is_none());
        assert!(resolver.get_supplier_requirements().await.is_none());
    }
}
