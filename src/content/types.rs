//! Normalized content objects handed to the page layer.
//!
//! Field names are independent of the CMS. Every field has a deterministic
//! default (empty string, empty list, `None`), so pages never probe nested
//! CMS shapes. Serialized as camelCase JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resolved image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSection {
    pub heading: String,
    pub body: String,
}

/// Title, description and icon: value cards, benefits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub title: String,
    pub description: String,
    pub icon_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub address: String,
    pub phone: String,
    pub email: String,
}

/// Resolved SEO fields; every string is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    pub meta_title: String,
    pub meta_description: String,
    pub og_title: String,
    pub og_description: String,
    pub twitter_title: String,
    pub twitter_description: String,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub no_index: bool,
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCard {
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub icon_name: String,
    pub href: String,
    pub image: Option<Image>,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub card: ServiceCard,
    pub description: String,
    pub features: Vec<String>,
    pub capabilities: Vec<String>,
    pub seo: Seo,
}

/// Compact service reference shown on industry pages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLink {
    pub title: String,
    pub slug: String,
    pub href: String,
    pub icon_name: String,
}

// ---------------------------------------------------------------------------
// Industries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryCard {
    pub title: String,
    pub slug: String,
    pub short_description: String,
    pub icon_name: String,
    pub href: String,
    pub image: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryDetail {
    #[serde(flatten)]
    pub card: IndustryCard,
    pub description: String,
    pub challenges: Vec<String>,
    pub capabilities: Vec<String>,
    pub certifications: Vec<String>,
    pub related_services: Vec<ServiceLink>,
    pub seo: Seo,
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCard {
    pub title: String,
    pub slug: String,
    pub category: String,
    pub category_label: String,
    pub excerpt: String,
    pub href: String,
    pub image: Option<Image>,
    pub published_date: Option<String>,
    pub read_time: Option<u32>,
    pub tags: Vec<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Download {
    pub url: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetail {
    #[serde(flatten)]
    pub card: ResourceCard,
    pub author: String,
    /// Rich-text body exactly as stored; `null` when absent.
    pub body: Value,
    pub download: Option<Download>,
    pub related: Vec<ResourceCard>,
    pub seo: Seo,
}

/// Static path parameters for a resource detail page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePath {
    pub category: String,
    pub slug: String,
}

// ---------------------------------------------------------------------------
// Site chrome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub heading: String,
    pub subheading: String,
    pub primary_cta: Option<Link>,
    pub secondary_cta: Option<Link>,
    pub image: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionIntro {
    pub heading: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToAction {
    pub heading: String,
    pub description: String,
    pub button: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Homepage {
    pub hero: Hero,
    pub stats: Vec<Stat>,
    pub services_section: SectionIntro,
    pub industries_section: SectionIntro,
    pub cta: CallToAction,
    pub certifications: Vec<String>,
    pub seo: Seo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub label: String,
    pub href: String,
    pub children: Vec<NavItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub items: Vec<NavItem>,
    pub cta: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterColumn {
    pub heading: String,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    pub tagline: String,
    pub columns: Vec<FooterColumn>,
    pub contact: ContactInfo,
    pub social: Vec<SocialLink>,
    pub certifications: Vec<String>,
    pub copyright: String,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub photo: Option<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub year: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutPage {
    pub title: String,
    pub description: String,
    pub image: Option<Image>,
    pub sections: Vec<TextSection>,
    pub values: Vec<Feature>,
    pub team: Vec<TeamMember>,
    pub stats: Vec<Stat>,
    pub timeline: Vec<Milestone>,
    pub seo: Seo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeHours {
    pub days: String,
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPage {
    pub title: String,
    pub description: String,
    pub contact: ContactInfo,
    pub hours: Vec<OfficeHours>,
    pub departments: Vec<Department>,
    pub map_embed_url: Option<String>,
    pub seo: Seo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub title: String,
    pub slug: String,
    pub department: String,
    pub location: String,
    pub employment_type: String,
    pub summary: String,
    pub requirements: Vec<String>,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareersPage {
    pub title: String,
    pub description: String,
    pub image: Option<Image>,
    pub culture: String,
    pub benefits: Vec<Feature>,
    pub jobs: Vec<JobListing>,
    pub seo: Seo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsPage {
    pub title: String,
    pub last_updated: Option<String>,
    pub sections: Vec<TextSection>,
    pub seo: Seo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementSection {
    pub title: String,
    pub description: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRequirementsPage {
    pub title: String,
    pub description: String,
    pub requirements: Vec<RequirementSection>,
    pub documents: Vec<DocumentLink>,
    pub contact_email: String,
    pub seo: Seo,
}
