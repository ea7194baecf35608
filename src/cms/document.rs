//! Typed document shapes, one per collection or global.
//!
//! Raw CMS documents are validated into these shapes at the mapper boundary.
//! Every field is optional or defaulted except identity (`slug` on collection
//! items): a document that fails to deserialize, or lacks its identity, is
//! rejected with a `DocumentError` rather than passed through untyped.
//!
//! Loosely-typed inputs the CMS emits in more than one form (media that may or
//! may not be populated, list items that may be strings or `{ text }` rows) are
//! coerced by dedicated untagged enums.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::cms::types::Document;

/// Every collection and global this site reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Service,
    Industry,
    Resource,
    Job,
    Homepage,
    Navigation,
    Footer,
    About,
    Contact,
    Careers,
    Terms,
    SupplierRequirements,
}

impl DocumentKind {
    pub const COLLECTIONS: [DocumentKind; 4] = [
        DocumentKind::Service,
        DocumentKind::Industry,
        DocumentKind::Resource,
        DocumentKind::Job,
    ];

    pub const GLOBALS: [DocumentKind; 8] = [
        DocumentKind::Homepage,
        DocumentKind::Navigation,
        DocumentKind::Footer,
        DocumentKind::About,
        DocumentKind::Contact,
        DocumentKind::Careers,
        DocumentKind::Terms,
        DocumentKind::SupplierRequirements,
    ];

    /// Collection name or global slug in the CMS.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Service => "services",
            DocumentKind::Industry => "industries",
            DocumentKind::Resource => "resources",
            DocumentKind::Job => "jobs",
            DocumentKind::Homepage => "homepage",
            DocumentKind::Navigation => "navigation",
            DocumentKind::Footer => "footer",
            DocumentKind::About => "about",
            DocumentKind::Contact => "contact",
            DocumentKind::Careers => "careers",
            DocumentKind::Terms => "terms",
            DocumentKind::SupplierRequirements => "supplier-requirements",
        }
    }

    /// True for globals (singletons), false for collections.
    pub fn is_global(&self) -> bool {
        Self::GLOBALS.contains(self)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a raw document was rejected.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{kind} document has unexpected shape: {source}")]
    Shape {
        kind: DocumentKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} document is missing required field '{field}'")]
    MissingField {
        kind: DocumentKind,
        field: &'static str,
    },
}

/// A typed shape for one document kind.
pub trait DocumentShape: DeserializeOwned {
    const KIND: DocumentKind;

    /// Checks serde cannot express.
    fn validate(&self) -> Result<(), DocumentError> {
        Ok(())
    }
}

/// Validate a raw document into its typed shape.
pub fn parse_document<T: DocumentShape>(raw: Document) -> Result<T, DocumentError> {
    let doc: T = serde_json::from_value(raw).map_err(|source| DocumentError::Shape {
        kind: T::KIND,
        source,
    })?;
    doc.validate()?;
    Ok(doc)
}

fn require_slug(kind: DocumentKind, slug: &str) -> Result<(), DocumentError> {
    if slug.trim().is_empty() {
        return Err(DocumentError::MissingField { kind, field: "slug" });
    }
    Ok(())
}

/// Read an explicit `null` the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any validated document, tagged by kind.
#[derive(Debug, Clone)]
pub enum CmsDocument {
    Service(ServiceDoc),
    Industry(IndustryDoc),
    Resource(ResourceDoc),
    Job(JobDoc),
    Homepage(HomepageDoc),
    Navigation(NavigationDoc),
    Footer(FooterDoc),
    About(AboutDoc),
    Contact(ContactDoc),
    Careers(CareersDoc),
    Terms(TermsDoc),
    SupplierRequirements(SupplierRequirementsDoc),
}

impl CmsDocument {
    /// Validate a raw document as `kind`.
    pub fn parse(kind: DocumentKind, raw: Document) -> Result<Self, DocumentError> {
        Ok(match kind {
            DocumentKind::Service => Self::Service(parse_document(raw)?),
            DocumentKind::Industry => Self::Industry(parse_document(raw)?),
            DocumentKind::Resource => Self::Resource(parse_document(raw)?),
            DocumentKind::Job => Self::Job(parse_document(raw)?),
            DocumentKind::Homepage => Self::Homepage(parse_document(raw)?),
            DocumentKind::Navigation => Self::Navigation(parse_document(raw)?),
            DocumentKind::Footer => Self::Footer(parse_document(raw)?),
            DocumentKind::About => Self::About(parse_document(raw)?),
            DocumentKind::Contact => Self::Contact(parse_document(raw)?),
            DocumentKind::Careers => Self::Careers(parse_document(raw)?),
            DocumentKind::Terms => Self::Terms(parse_document(raw)?),
            DocumentKind::SupplierRequirements => Self::SupplierRequirements(parse_document(raw)?),
        })
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Service(_) => DocumentKind::Service,
            Self::Industry(_) => DocumentKind::Industry,
            Self::Resource(_) => DocumentKind::Resource,
            Self::Job(_) => DocumentKind::Job,
            Self::Homepage(_) => DocumentKind::Homepage,
            Self::Navigation(_) => DocumentKind::Navigation,
            Self::Footer(_) => DocumentKind::Footer,
            Self::About(_) => DocumentKind::About,
            Self::Contact(_) => DocumentKind::Contact,
            Self::Careers(_) => DocumentKind::Careers,
            Self::Terms(_) => DocumentKind::Terms,
            Self::SupplierRequirements(_) => DocumentKind::SupplierRequirements,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared field shapes
// ---------------------------------------------------------------------------

/// An upload field: populated media object, bare URL, or an unpopulated id.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MediaDoc {
    Populated(MediaObject),
    Url(String),
    Other(Value),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MediaObject {
    pub url: Option<String>,
    pub alt: Option<String>,
    pub filename: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A list row: either a bare string or an object with one text field.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TextItem {
    Plain(String),
    Row(Map<String, Value>),
}

impl TextItem {
    const KEYS: [&'static str; 7] = ["text", "feature", "item", "label", "value", "title", "name"];

    /// The row's text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            TextItem::Plain(s) => Some(s.as_str()),
            TextItem::Row(fields) => Self::KEYS
                .iter()
                .find_map(|k| fields.get(*k).and_then(Value::as_str)),
        }
    }
}

/// A relationship: populated document or bare id.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RelationDoc {
    Populated(RelatedDoc),
    Id(Value),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelatedDoc {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
}

/// SEO group as stored by the CMS SEO plugin.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeoDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub image: Option<MediaDoc>,
    pub canonical_url: Option<String>,
    pub no_index: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkDoc {
    pub label: Option<String>,
    pub href: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpecDoc {
    pub label: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StatDoc {
    pub value: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SectionDoc {
    pub heading: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CardDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactInfoDoc {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceDoc {
    pub title: Option<String>,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub image: Option<MediaDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub specs: Vec<SpecDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub features: Vec<TextItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub capabilities: Vec<TextItem>,
    pub order: Option<f64>,
    pub meta: Option<SeoDoc>,
}

impl DocumentShape for ServiceDoc {
    const KIND: DocumentKind = DocumentKind::Service;

    fn validate(&self) -> Result<(), DocumentError> {
        require_slug(Self::KIND, &self.slug)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndustryDoc {
    pub title: Option<String>,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub image: Option<MediaDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub challenges: Vec<TextItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub capabilities: Vec<TextItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<TextItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub related_services: Vec<RelationDoc>,
    pub order: Option<f64>,
    pub meta: Option<SeoDoc>,
}

impl DocumentShape for IndustryDoc {
    const KIND: DocumentKind = DocumentKind::Industry;

    fn validate(&self) -> Result<(), DocumentError> {
        require_slug(Self::KIND, &self.slug)
    }
}

/// Resource category: a slug string or a populated category document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CategoryDoc {
    Slug(String),
    Populated(RelatedDoc),
    Id(Value),
}

impl CategoryDoc {
    pub fn slug(&self) -> Option<&str> {
        match self {
            CategoryDoc::Slug(s) => Some(s.as_str()),
            CategoryDoc::Populated(doc) => doc.slug.as_deref(),
            CategoryDoc::Id(_) => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            CategoryDoc::Populated(doc) => doc.title.as_deref().or(doc.name.as_deref()),
            CategoryDoc::Slug(_) | CategoryDoc::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceDoc {
    pub title: Option<String>,
    pub slug: String,
    pub category: Option<CategoryDoc>,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    pub content: Value,
    pub image: Option<MediaDoc>,
    pub download: Option<MediaDoc>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub read_time: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<TextItem>,
    pub featured: Option<bool>,
    pub meta: Option<SeoDoc>,
}

impl DocumentShape for ResourceDoc {
    const KIND: DocumentKind = DocumentKind::Resource;

    fn validate(&self) -> Result<(), DocumentError> {
        require_slug(Self::KIND, &self.slug)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobDoc {
    pub title: Option<String>,
    pub slug: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub requirements: Vec<TextItem>,
    pub status: Option<String>,
}

impl DocumentShape for JobDoc {
    const KIND: DocumentKind = DocumentKind::Job;

    fn validate(&self) -> Result<(), DocumentError> {
        require_slug(Self::KIND, &self.slug)
    }
}

// ---------------------------------------------------------------------------
// Globals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroDoc {
    pub heading: Option<String>,
    pub subheading: Option<String>,
    pub primary_cta: Option<LinkDoc>,
    pub secondary_cta: Option<LinkDoc>,
    pub image: Option<MediaDoc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionIntroDoc {
    pub heading: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaDoc {
    pub heading: Option<String>,
    pub description: Option<String>,
    pub button: Option<LinkDoc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomepageDoc {
    pub title: Option<String>,
    pub hero: Option<HeroDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub stats: Vec<StatDoc>,
    pub services_section: Option<SectionIntroDoc>,
    pub industries_section: Option<SectionIntroDoc>,
    pub cta: Option<CtaDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<TextItem>,
    pub meta: Option<SeoDoc>,
}

impl DocumentShape for HomepageDoc {
    const KIND: DocumentKind = DocumentKind::Homepage;
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavItemDoc {
    pub label: Option<String>,
    pub href: Option<String>,
    pub url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<NavItemDoc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationDoc {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<NavItemDoc>,
    pub cta: Option<LinkDoc>,
}

impl DocumentShape for NavigationDoc {
    const KIND: DocumentKind = DocumentKind::Navigation;
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterColumnDoc {
    pub heading: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<LinkDoc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialDoc {
    pub platform: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterDoc {
    pub tagline: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub columns: Vec<FooterColumnDoc>,
    pub contact: Option<ContactInfoDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub social: Vec<SocialDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<TextItem>,
    pub copyright: Option<String>,
}

impl DocumentShape for FooterDoc {
    const KIND: DocumentKind = DocumentKind::Footer;
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamMemberDoc {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub photo: Option<MediaDoc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MilestoneDoc {
    pub year: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<MediaDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Vec<SectionDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub values: Vec<CardDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub team: Vec<TeamMemberDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub stats: Vec<StatDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub timeline: Vec<MilestoneDoc>,
    pub meta: Option<SeoDoc>,
}

impl DocumentShape for AboutDoc {
    const KIND: DocumentKind = DocumentKind::About;
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoursDoc {
    pub days: Option<String>,
    pub hours: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepartmentDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub hours: Vec<HoursDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub departments: Vec<DepartmentDoc>,
    pub map_embed_url: Option<String>,
    pub meta: Option<SeoDoc>,
}

impl DocumentShape for ContactDoc {
    const KIND: DocumentKind = DocumentKind::Contact;
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CareersDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<MediaDoc>,
    pub culture: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub benefits: Vec<CardDoc>,
    pub meta: Option<SeoDoc>,
}

impl DocumentShape for CareersDoc {
    const KIND: DocumentKind = DocumentKind::Careers;
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TermsDoc {
    pub title: Option<String>,
    pub last_updated: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Vec<SectionDoc>,
    pub meta: Option<SeoDoc>,
}

impl DocumentShape for TermsDoc {
    const KIND: DocumentKind = DocumentKind::Terms;
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequirementDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<TextItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupplierDocumentDoc {
    pub title: Option<String>,
    pub file: Option<MediaDoc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupplierRequirementsDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub requirements: Vec<RequirementDoc>,
    #[serde(deserialize_with = "null_as_default")]
    pub documents: Vec<SupplierDocumentDoc>,
    pub contact_email: Option<String>,
    pub meta: Option<SeoDoc>,
}

impl DocumentShape for SupplierRequirementsDoc {
    const KIND: DocumentKind = DocumentKind::SupplierRequirements;
}
