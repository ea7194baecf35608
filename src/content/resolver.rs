//! Request-scoped content resolution.
//!
//! # Responsibilities
//! - Hold the process-wide pieces every request shares (`Site`)
//! - Hand each request a `ContentResolver` with its own client handle
//! - Run every CMS call through the fallback resolver
//! - Contain mapper errors: log, count, return the empty value
//!
//! # Design Decisions
//! - The client handle is initialized lazily and at most once per resolver,
//!   even when several mappers run concurrently
//! - A timed-out query looks exactly like an empty one to mappers
//! - Invalid documents are dropped individually; one bad entry never empties a list
//! - A panicking backend call becomes a `CmsError` and is contained like any other

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use tokio::sync::OnceCell;

use crate::cms::document::{parse_document, DocumentShape};
use crate::cms::init::{factory_from_config, init_client, ClientFactory};
use crate::cms::query::FindQuery;
use crate::cms::source::SharedSource;
use crate::cms::types::{CmsError, CmsResult, Document, FindResult};
use crate::config::schema::{ContentConfig, SiteConfig};
use crate::content::normalize::MediaResolver;
use crate::content::seo::SeoDefaults;
use crate::observability::metrics;
use crate::resilience::{Racer, TimeoutPolicy};

/// Content shaping settings shared by all mappers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSettings {
    pub media: MediaResolver,
    pub max_docs: usize,
    pub related_limit: usize,
    pub seo: SeoDefaults,
}

impl ContentSettings {
    pub fn from_config(config: &ContentConfig) -> Self {
        Self {
            media: MediaResolver::new(config.media_base_url.as_deref()),
            max_docs: config.max_docs,
            related_limit: config.related_limit,
            seo: SeoDefaults {
                title: config.site_title.clone(),
                description: config.site_description.clone(),
            },
        }
    }
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self::from_config(&ContentConfig::default())
    }
}

/// Process-wide content state: backend factory, deadlines, settings.
#[derive(Clone)]
pub struct Site {
    factory: Arc<dyn ClientFactory>,
    racer: Racer,
    init_racer: Racer,
    settings: Arc<ContentSettings>,
}

impl Site {
    /// Assemble a site around an existing factory.
    pub fn new(factory: Arc<dyn ClientFactory>, config: &SiteConfig) -> Self {
        let policy: TimeoutPolicy = config.cms.timeout_policy;
        Self {
            factory,
            racer: Racer::new(std::time::Duration::from_millis(config.cms.timeout_ms), policy),
            init_racer: Racer::new(
                std::time::Duration::from_millis(config.cms.init_timeout_ms()),
                policy,
            ),
            settings: Arc::new(ContentSettings::from_config(&config.content)),
        }
    }

    /// Assemble a site with the backend selected by configuration.
    pub fn from_config(config: &SiteConfig) -> CmsResult<Self> {
        Ok(Self::new(factory_from_config(&config.cms)?, config))
    }

    /// A fresh resolver for one request.
    pub fn resolver(&self) -> ContentResolver {
        ContentResolver {
            factory: self.factory.clone(),
            racer: self.racer,
            init_racer: self.init_racer,
            settings: self.settings.clone(),
            client: OnceCell::new(),
        }
    }

    pub fn backend(&self) -> &'static str {
        self.factory.backend()
    }

    pub fn settings(&self) -> &ContentSettings {
        &self.settings
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("backend", &self.factory.backend())
            .field("racer", &self.racer)
            .field("settings", &self.settings)
            .finish()
    }
}

/// Resolves content for a single request.
///
/// Mapper operations live in the sibling modules (`services`, `industries`,
/// `resources`, `site`, `pages`, `paths`).
pub struct ContentResolver {
    factory: Arc<dyn ClientFactory>,
    racer: Racer,
    init_racer: Racer,
    settings: Arc<ContentSettings>,
    client: OnceCell<SharedSource>,
}

impl ContentResolver {
    pub fn settings(&self) -> &ContentSettings {
        &self.settings
    }

    /// The request's client handle, initialized on first use.
    async fn client(&self) -> CmsResult<SharedSource> {
        self.client
            .get_or_try_init(|| init_client(self.factory.clone(), &self.init_racer))
            .await
            .cloned()
    }

    /// Run a collection query under the deadline. Timeouts yield no documents.
    pub(crate) async fn find(&self, query: FindQuery) -> CmsResult<Vec<Document>> {
        let client = self.client().await?;
        let collection = query.collection.clone();
        let start = Instant::now();

        let result = self
            .racer
            .with_fallback(guarded(async move { client.find(&query).await }), Ok(FindResult::empty()))
            .await;

        metrics::record_cms_query(&collection, outcome(&result), start);
        result.map(|found| found.docs)
    }

    /// Fetch a global under the deadline. Timeouts yield `None`.
    pub(crate) async fn find_global(&self, slug: &str) -> CmsResult<Option<Document>> {
        let client = self.client().await?;
        let owned = slug.to_string();
        let start = Instant::now();

        let result = self
            .racer
            .with_fallback(guarded(async move { client.find_global(&owned).await }), Ok(None))
            .await;

        metrics::record_cms_query(slug, outcome(&result), start);
        result
    }
}

/// Catch a panic inside a backend call and report it as an error.
async fn guarded<T, F>(call: F) -> CmsResult<T>
where
    F: Future<Output = CmsResult<T>>,
{
    AssertUnwindSafe(call)
        .catch_unwind()
        .await
        .unwrap_or_else(|_| Err(CmsError::Backend("CMS call panicked".to_string())))
}

fn outcome<T>(result: &CmsResult<T>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "error"
    }
}

/// Validate raw documents into `T`, dropping the ones that do not fit.
pub(crate) fn decode_docs<T: DocumentShape>(docs: Vec<Document>) -> Vec<T> {
    docs.into_iter().filter_map(decode_doc).collect()
}

/// Validate one raw document into `T`; invalid documents count as missing.
pub(crate) fn decode_doc<T: DocumentShape>(doc: Document) -> Option<T> {
    match parse_document::<T>(doc) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(collection = %T::KIND, error = %e, "Skipping invalid CMS document");
            None
        }
    }
}

/// Turn a mapper failure into the mapper's empty value.
pub(crate) fn contain<T: Default>(
    content_type: &'static str,
    key: Option<&str>,
    result: CmsResult<T>,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log_failure(content_type, key, &e);
            metrics::record_cms_error(content_type);
            T::default()
        }
    }
}

fn log_failure(content_type: &'static str, key: Option<&str>, error: &CmsError) {
    match key {
        Some(slug) => tracing::warn!(content_type, slug, error = %error, "Content lookup failed"),
        None => tracing::warn!(content_type, error = %error, "Content lookup failed"),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::memory_site;
    use super::*;
    use crate::cms::document::ServiceDoc;
    use crate::cms::memory::MemorySource;
    use crate::cms::StaticFactory;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_client_initialized_once_per_resolver() {
        struct CountingFactory(std::sync::atomic::AtomicUsize);

        #[async_trait::async_trait]
        impl ClientFactory for CountingFactory {
            async fn connect(&self) -> CmsResult<SharedSource> {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(Arc::new(MemorySource::new()))
            }

            fn backend(&self) -> &'static str {
                "counting"
            }
        }

        let factory = Arc::new(CountingFactory(Default::default()));
        let site = Site::new(factory.clone(), &SiteConfig::default());
        let resolver = site.resolver();
        let (a, b) = tokio::join!(
            resolver.find(FindQuery::new("services")),
            resolver.find_global("homepage")
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(factory.0.load(std::sync::atomic::Ordering::SeqCst), 1);

        let _ = site.resolver().find(FindQuery::new("services")).await;
        assert_eq!(factory.0.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_query_is_empty() {
        let source = MemorySource::new()
            .with_docs("services", vec![json!({ "slug": "metrology" })])
            .with_latency(Duration::from_millis(5000));
        let resolver = memory_site(source).resolver();

        let docs = resolver.find(FindQuery::new("services")).await.unwrap();
        assert!(docs.is_empty());
    }

    struct PanickingSource;

    #[async_trait::async_trait]
    impl crate::cms::ContentSource for PanickingSource {
        async fn find(&self, _query: &FindQuery) -> CmsResult<FindResult> {
            panic!("driver bug")
        }

        async fn find_global(&self, _slug: &str) -> CmsResult<Option<Document>> {
            panic!("driver bug")
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn test_panicking_backend_resolves_to_empty() {
        for policy in [TimeoutPolicy::Detach, TimeoutPolicy::Cancel] {
            let mut config = SiteConfig::default();
            config.cms.timeout_policy = policy;
            let site = Site::new(Arc::new(StaticFactory::new(Arc::new(PanickingSource))), &config);
            let resolver = site.resolver();

            assert!(matches!(
                resolver.find(FindQuery::new("services")).await,
                Err(CmsError::Backend(_))
            ));
            assert!(resolver.get_services().await.is_empty());
            assert!(resolver.get_homepage().await.is_none());
        }
    }

    #[tokio::test]
    async fn test_backend_error_propagates_to_mapper() {
        let resolver = memory_site(MemorySource::new().failing("homepage")).resolver();
        assert!(resolver.find_global("homepage").await.is_err());
    }

    #[test]
    fn test_decode_skips_invalid_documents() {
        let docs = vec![
            json!({ "slug": "metrology" }),
            json!({ "title": "No slug" }),
            json!({ "slug": "x", "specs": 7 }),
        ];
        let parsed: Vec<ServiceDoc> = decode_docs(docs);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].slug, "metrology");
    }

    #[test]
    fn test_contain_returns_empty_value() {
        let list: Vec<u32> = contain("services", None, Err(CmsError::Backend("down".into())));
        assert!(list.is_empty());
        let item: Option<u32> = contain("services", Some("x"), Err(CmsError::InitTimeout { ms: 1 }));
        assert!(item.is_none());
    }

    #[test]
    fn test_settings_follow_config() {
        let mut config = SiteConfig::default();
        config.content.media_base_url = Some("https://cms.example.com".into());
        config.content.related_limit = 5;
        let site = Site::new(
            Arc::new(StaticFactory::new(Arc::new(MemorySource::new()))),
            &config,
        );
        assert_eq!(site.settings().related_limit, 5);
        assert_eq!(
            site.settings().media.absolute("/media/a.png"),
            "https://cms.example.com/media/a.png"
        );
        assert_eq!(site.backend(), "memory");
    }
}
