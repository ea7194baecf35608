//! CMS access subsystem.
//!
//! # Data Flow
//! ```text
//! SiteConfig.cms (backend, base_url, content_dir)
//!     → init.rs (ClientFactory, bounded by the deadline)
//!     → source.rs (ContentSource: find / find_global)
//!         → payload.rs (document-database CMS over REST)
//!         → git.rs (Git-based CMS checkout on disk)
//!         → memory.rs (in-process documents)
//!     → raw JSON documents
//!     → document.rs (typed per-collection shapes, validated)
//!     → audit.rs (whole-backend validation report)
//! ```
//!
//! # Design Decisions
//! - The core only depends on the `ContentSource` trait
//! - Handles are obtained through an explicit factory, never a global
//! - Documents are untyped until the mapper boundary, then validated

pub mod audit;
pub mod document;
pub mod git;
pub mod init;
pub mod memory;
pub mod payload;
pub mod query;
pub mod source;
pub mod types;

pub use document::{CmsDocument, DocumentKind};
pub use init::{factory_from_config, init_client, ClientFactory, StaticFactory};
pub use memory::MemorySource;
pub use query::{Condition, FindQuery, Op};
pub use source::{ContentSource, SharedSource};
pub use types::{CmsError, CmsResult, Document, FindResult};
