//! Site chrome: homepage, navigation, footer.

use crate::cms::document::{
    DocumentKind, DocumentShape, FooterDoc, HomepageDoc, NavItemDoc, NavigationDoc, SectionIntroDoc,
    StatDoc,
};
use crate::cms::types::CmsResult;
use crate::content::normalize::{first_text, link, opt_image, opt_link, text, texts};
use crate::content::resolver::{contain, decode_doc, ContentResolver, ContentSettings};
use crate::content::seo::{resolve_seo, PageSeo};
use crate::content::types::{
    CallToAction, ContactInfo, Footer, FooterColumn, Hero, Homepage, NavItem, Navigation,
    SectionIntro, SocialLink, Stat,
};

impl ContentResolver {
    pub async fn get_homepage(&self) -> Option<Homepage> {
        let result = self.load_global::<HomepageDoc>().await;
        contain(
            DocumentKind::Homepage.as_str(),
            None,
            result.map(|doc| doc.map(|d| homepage(&d, self.settings()))),
        )
    }

    pub async fn get_navigation(&self) -> Option<Navigation> {
        let result = self.load_global::<NavigationDoc>().await;
        contain(
            DocumentKind::Navigation.as_str(),
            None,
            result.map(|doc| doc.map(|d| navigation(&d))),
        )
    }

    pub async fn get_footer(&self) -> Option<Footer> {
        let result = self.load_global::<FooterDoc>().await;
        contain(
            DocumentKind::Footer.as_str(),
            None,
            result.map(|doc| doc.map(|d| footer(&d))),
        )
    }

    /// Fetch and validate a global. Missing and invalid both yield `None`.
    pub(crate) async fn load_global<T: DocumentShape>(&self) -> CmsResult<Option<T>> {
        Ok(self.find_global(T::KIND.as_str()).await?.and_then(decode_doc))
    }
}

pub fn homepage(doc: &HomepageDoc, settings: &ContentSettings) -> Homepage {
    let hero = doc.hero.clone().unwrap_or_default();
    let cta = doc.cta.clone().unwrap_or_default();
    let heading = text(&hero.heading);
    let page = PageSeo::new(
        doc.meta.as_ref(),
        doc.title.as_deref().or(hero.heading.as_deref()),
        hero.subheading.as_deref(),
    );
    Homepage {
        hero: Hero {
            image: opt_image(&hero.image, &settings.media, &heading),
            heading,
            subheading: text(&hero.subheading),
            primary_cta: opt_link(&hero.primary_cta),
            secondary_cta: opt_link(&hero.secondary_cta),
        },
        stats: stats(&doc.stats),
        services_section: section_intro(&doc.services_section),
        industries_section: section_intro(&doc.industries_section),
        cta: CallToAction {
            heading: text(&cta.heading),
            description: text(&cta.description),
            button: opt_link(&cta.button),
        },
        certifications: texts(&doc.certifications),
        seo: resolve_seo(page, &settings.seo, &settings.media),
    }
}

/// Stats with both a value and a label.
pub fn stats(docs: &[StatDoc]) -> Vec<Stat> {
    docs.iter()
        .filter_map(|doc| {
            let value = first_text([doc.value.as_deref()]);
            let label = first_text([doc.label.as_deref()]);
            (!value.is_empty() && !label.is_empty()).then_some(Stat { value, label })
        })
        .collect()
}

fn section_intro(doc: &Option<SectionIntroDoc>) -> SectionIntro {
    doc.as_ref()
        .map(|d| SectionIntro {
            heading: text(&d.heading),
            description: text(&d.description),
        })
        .unwrap_or_default()
}

pub fn navigation(doc: &NavigationDoc) -> Navigation {
    Navigation {
        items: doc.items.iter().filter_map(nav_item).collect(),
        cta: opt_link(&doc.cta),
    }
}

/// A navigation entry. Entries without a label are dropped; group headers
/// may omit the href when they have children.
fn nav_item(doc: &NavItemDoc) -> Option<NavItem> {
    let label = first_text([doc.label.as_deref()]);
    let href = first_text([doc.href.as_deref(), doc.url.as_deref()]);
    let children: Vec<NavItem> = doc.children.iter().filter_map(nav_item).collect();
    if label.is_empty() || (href.is_empty() && children.is_empty()) {
        return None;
    }
    Some(NavItem {
        label,
        href,
        children,
    })
}

pub fn footer(doc: &FooterDoc) -> Footer {
    let contact = doc.contact.clone().unwrap_or_default();
    Footer {
        tagline: text(&doc.tagline),
        columns: doc
            .columns
            .iter()
            .map(|column| FooterColumn {
                heading: text(&column.heading),
                links: column.links.iter().filter_map(link).collect(),
            })
            .collect(),
        contact: ContactInfo {
            address: text(&contact.address),
            phone: text(&contact.phone),
            email: text(&contact.email),
        },
        social: doc
            .social
            .iter()
            .filter_map(|s| {
                let url = first_text([s.url.as_deref()]);
                (!url.is_empty()).then(|| SocialLink {
                    platform: text(&s.platform),
                    url,
                })
            })
            .collect(),
        certifications: texts(&doc.certifications),
        copyright: text(&doc.copyright),
    }
}
