//! Field normalization shared by all mappers.

use crate::cms::document::{LinkDoc, MediaDoc, TextItem};
use crate::content::types::{Image, Link};

/// Turns CMS media references into absolute URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaResolver {
    base: Option<String>,
}

impl MediaResolver {
    pub fn new(base: Option<&str>) -> Self {
        Self {
            base: base
                .map(|b| b.trim_end_matches('/').to_string())
                .filter(|b| !b.is_empty()),
        }
    }

    /// Prefix root-relative URLs with the media base, if one is configured.
    pub fn absolute(&self, url: &str) -> String {
        match (&self.base, url.starts_with('/')) {
            (Some(base), true) => format!("{base}{url}"),
            _ => url.to_string(),
        }
    }
}

fn is_url_like(s: &str) -> bool {
    s.starts_with('/') || s.starts_with("http://") || s.starts_with("https://")
}

/// Resolve a media field to an image. Unpopulated ids resolve to `None`.
pub fn media_image(doc: &MediaDoc, media: &MediaResolver, fallback_alt: &str) -> Option<Image> {
    match doc {
        MediaDoc::Populated(object) => {
            let url = object.url.as_deref().filter(|u| is_url_like(u))?;
            Some(Image {
                url: media.absolute(url),
                alt: first_text([object.alt.as_deref(), Some(fallback_alt)]),
                width: object.width,
                height: object.height,
            })
        }
        MediaDoc::Url(url) if is_url_like(url) => Some(Image {
            url: media.absolute(url),
            alt: fallback_alt.to_string(),
            width: None,
            height: None,
        }),
        _ => None,
    }
}

/// Resolve a media field to just its URL.
pub fn media_url(doc: &MediaDoc, media: &MediaResolver) -> Option<String> {
    media_image(doc, media, "").map(|image| image.url)
}

pub fn opt_image(doc: &Option<MediaDoc>, media: &MediaResolver, fallback_alt: &str) -> Option<Image> {
    doc.as_ref().and_then(|d| media_image(d, media, fallback_alt))
}

/// Owned copy of an optional string, empty when absent.
pub fn text(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// First candidate that is present and not blank, trimmed, else empty.
pub fn first_text<'a, I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Text of every non-blank list row.
pub fn texts(items: &[TextItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(TextItem::text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Detail-page path. Never taken from the CMS.
pub fn detail_href(collection: &str, slug: &str) -> String {
    format!("/{}/{}", collection.trim_matches('/'), slug)
}

/// A CMS link, or `None` when it has nowhere to go.
pub fn link(doc: &LinkDoc) -> Option<Link> {
    let href = first_text([doc.href.as_deref(), doc.url.as_deref()]);
    if href.is_empty() {
        return None;
    }
    Some(Link {
        label: text(&doc.label),
        href,
    })
}

pub fn opt_link(doc: &Option<LinkDoc>) -> Option<Link> {
    doc.as_ref().and_then(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::document::MediaObject;

    #[test]
    fn test_detail_href() {
        assert_eq!(detail_href("services", "5-axis-machining"), "/services/5-axis-machining");
        assert_eq!(detail_href("resources/guides", "gdt"), "/resources/guides/gdt");
    }

    #[test]
    fn test_media_resolution() {
        let media = MediaResolver::new(Some("https://cms.example.com/"));
        let doc = MediaDoc::Populated(MediaObject {
            url: Some("/media/mill.jpg".into()),
            width: Some(1200),
            ..MediaObject::default()
        });
        let image = media_image(&doc, &media, "5-Axis Machining").unwrap();
        assert_eq!(image.url, "https://cms.example.com/media/mill.jpg");
        assert_eq!(image.alt, "5-Axis Machining");
        assert_eq!(image.width, Some(1200));

        let absolute = MediaDoc::Url("https://cdn.example.com/a.png".into());
        assert_eq!(media_url(&absolute, &media).as_deref(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn test_unpopulated_media_is_none() {
        let media = MediaResolver::default();
        assert!(media_image(&MediaDoc::Url("65f1c0ffee".into()), &media, "").is_none());
        assert!(media_image(&MediaDoc::Other(serde_json::json!(42)), &media, "").is_none());
        assert!(media_image(&MediaDoc::Populated(MediaObject::default()), &media, "").is_none());
    }

    #[test]
    fn test_first_text_skips_blank() {
        assert_eq!(first_text([Some(""), None, Some("Tight tolerances")]), "Tight tolerances");
        assert_eq!(first_text([None, None]), "");
        assert_eq!(first_text([Some("   "), Some("  CMM inspection ")]), "CMM inspection");
    }

    #[test]
    fn test_link_requires_target() {
        let doc = LinkDoc {
            label: Some("Request a Quote".into()),
            href: None,
            url: Some("/contact".into()),
        };
        assert_eq!(
            link(&doc),
            Some(Link {
                label: "Request a Quote".into(),
                href: "/contact".into()
            })
        );
        assert_eq!(link(&LinkDoc::default()), None);
    }
}
