//! Content resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Page request
//!     → resolver.rs (Site → ContentResolver, one client per request)
//!     → services.rs / industries.rs / resources.rs / site.rs / pages.rs / paths.rs
//!         → FindQuery / global slug, raced against the deadline
//!         → typed documents (cms::document), invalid entries dropped
//!         → normalize.rs + icons.rs + seo.rs
//!     → types.rs (normalized content objects)
//! ```
//!
//! # Design Decisions
//! - Mappers never fail: errors are logged and become the empty value
//! - Timed out and empty are the same to callers
//! - `href` values are built here, never read from the CMS
//! - Independent sub-queries within a mapper run concurrently

pub mod icons;
pub mod industries;
pub mod normalize;
pub mod pages;
pub mod paths;
pub mod resolver;
pub mod resources;
pub mod seo;
pub mod services;
pub mod site;
pub mod types;

pub use resolver::{ContentResolver, ContentSettings, Site};
pub use seo::{resolve_chain, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
