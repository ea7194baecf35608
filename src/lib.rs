//! Content resolution layer for the IIS Precision Manufacturing site.

pub mod cms;
pub mod config;
pub mod content;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::SiteConfig;
pub use content::{ContentResolver, Site};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
