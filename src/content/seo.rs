//! SEO field resolution.
//!
//! Each output field walks an ordered list of candidates and takes the first
//! non-blank one, ending at a site-wide default:
//!
//! ```text
//! metaTitle:          meta.title → page title → site title
//! ogTitle:            meta.ogTitle → meta.title → page title → site title
//! twitterTitle:       meta.twitterTitle → meta.ogTitle → meta.title → page title → site title
//! (descriptions follow the same shape with the site description)
//! ```

use crate::cms::document::SeoDoc;
use crate::content::normalize::{media_url, MediaResolver};
use crate::content::types::Seo;

/// Last-resort title for every page.
pub const DEFAULT_TITLE: &str = "IIS Precision Manufacturing";

/// Last-resort description for every page.
pub const DEFAULT_DESCRIPTION: &str =
    "Precision CNC machining, engineering, and metrology for aerospace, defense, and energy.";

/// First candidate that is present and not blank, else `default`.
pub fn resolve_chain<'a, I>(candidates: I, default: &str) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Site-level fallbacks for SEO chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoDefaults {
    pub title: String,
    pub description: String,
}

impl Default for SeoDefaults {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Page-level inputs to the chains.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageSeo<'a> {
    pub meta: Option<&'a SeoDoc>,
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
}

impl<'a> PageSeo<'a> {
    pub fn new(meta: Option<&'a SeoDoc>, title: Option<&'a str>, description: Option<&'a str>) -> Self {
        Self {
            meta,
            title,
            description,
        }
    }

    fn field(&self, pick: fn(&SeoDoc) -> &Option<String>) -> Option<&'a str> {
        self.meta.and_then(|m| pick(m).as_deref())
    }
}

pub fn meta_title(page: PageSeo<'_>, defaults: &SeoDefaults) -> String {
    resolve_chain([page.field(|m| &m.title), page.title], &defaults.title)
}

pub fn og_title(page: PageSeo<'_>, defaults: &SeoDefaults) -> String {
    resolve_chain(
        [page.field(|m| &m.og_title), page.field(|m| &m.title), page.title],
        &defaults.title,
    )
}

pub fn twitter_title(page: PageSeo<'_>, defaults: &SeoDefaults) -> String {
    resolve_chain(
        [
            page.field(|m| &m.twitter_title),
            page.field(|m| &m.og_title),
            page.field(|m| &m.title),
            page.title,
        ],
        &defaults.title,
    )
}

pub fn meta_description(page: PageSeo<'_>, defaults: &SeoDefaults) -> String {
    resolve_chain(
        [page.field(|m| &m.description), page.description],
        &defaults.description,
    )
}

pub fn og_description(page: PageSeo<'_>, defaults: &SeoDefaults) -> String {
    resolve_chain(
        [
            page.field(|m| &m.og_description),
            page.field(|m| &m.description),
            page.description,
        ],
        &defaults.description,
    )
}

pub fn twitter_description(page: PageSeo<'_>, defaults: &SeoDefaults) -> String {
    resolve_chain(
        [
            page.field(|m| &m.twitter_description),
            page.field(|m| &m.og_description),
            page.field(|m| &m.description),
            page.description,
        ],
        &defaults.description,
    )
}

/// Resolve every SEO output field for a page.
pub fn resolve_seo(page: PageSeo<'_>, defaults: &SeoDefaults, media: &MediaResolver) -> Seo {
    Seo {
        meta_title: meta_title(page, defaults),
        meta_description: meta_description(page, defaults),
        og_title: og_title(page, defaults),
        og_description: og_description(page, defaults),
        twitter_title: twitter_title(page, defaults),
        twitter_description: twitter_description(page, defaults),
        og_image: page
            .meta
            .and_then(|m| m.image.as_ref())
            .and_then(|image| media_url(image, media)),
        canonical_url: page.meta.and_then(|m| m.canonical_url.clone()),
        no_index: page.meta.and_then(|m| m.no_index).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: Option<&str>, og: Option<&str>, twitter: Option<&str>) -> SeoDoc {
        SeoDoc {
            title: title.map(String::from),
            og_title: og.map(String::from),
            twitter_title: twitter.map(String::from),
            ..SeoDoc::default()
        }
    }

    #[test]
    fn test_chain_skips_blank_candidates() {
        let value = resolve_chain([None, Some("  "), Some("Aerospace")], DEFAULT_TITLE);
        assert_eq!(value, "Aerospace");
    }

    #[test]
    fn test_meta_title_feeds_og_and_twitter() {
        let doc = meta(Some("X"), None, None);
        let page = PageSeo::new(Some(&doc), None, None);
        let defaults = SeoDefaults::default();
        assert_eq!(meta_title(page, &defaults), "X");
        assert_eq!(og_title(page, &defaults), "X");
        assert_eq!(twitter_title(page, &defaults), "X");
    }

    #[test]
    fn test_nothing_set_uses_site_title() {
        let defaults = SeoDefaults::default();
        let page = PageSeo::default();
        assert_eq!(meta_title(page, &defaults), "IIS Precision Manufacturing");
        assert_eq!(og_title(page, &defaults), "IIS Precision Manufacturing");
        assert_eq!(twitter_title(page, &defaults), "IIS Precision Manufacturing");
        assert_eq!(meta_description(page, &defaults), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_specific_fields_win() {
        let doc = meta(Some("Meta"), Some("Open Graph"), Some("Twitter"));
        let page = PageSeo::new(Some(&doc), Some("Page"), None);
        let defaults = SeoDefaults::default();
        assert_eq!(meta_title(page, &defaults), "Meta");
        assert_eq!(og_title(page, &defaults), "Open Graph");
        assert_eq!(twitter_title(page, &defaults), "Twitter");
    }

    #[test]
    fn test_twitter_prefers_og_over_meta() {
        let doc = meta(Some("Meta"), Some("Open Graph"), None);
        let page = PageSeo::new(Some(&doc), None, None);
        assert_eq!(twitter_title(page, &SeoDefaults::default()), "Open Graph");
    }

    #[test]
    fn test_page_fields_used_before_site_default() {
        let page = PageSeo::new(None, Some("Metrology"), Some("CMM inspection"));
        let defaults = SeoDefaults::default();
        assert_eq!(og_title(page, &defaults), "Metrology");
        assert_eq!(twitter_description(page, &defaults), "CMM inspection");
    }

    #[test]
    fn test_resolve_seo_totality() {
        let seo = resolve_seo(PageSeo::default(), &SeoDefaults::default(), &MediaResolver::default());
        assert_eq!(seo.og_title, DEFAULT_TITLE);
        assert_eq!(seo.og_description, DEFAULT_DESCRIPTION);
        assert_eq!(seo.og_image, None);
        assert!(!seo.no_index);
    }
}
