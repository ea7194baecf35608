//! Document-database CMS over its REST API.
//!
//! # Responsibilities
//! - Translate `FindQuery` into the CMS query-string dialect
//! - Fetch collections from `/api/{collection}` and globals from `/api/globals/{slug}`
//! - Map HTTP failures to `CmsError`
//!
//! # Query String
//! ```text
//! where[slug][equals]=5-axis-machining
//! where[_status][not_equals]=draft
//! where[slug][in]=a,b
//! sort=-publishedDate&limit=10&depth=1&select[slug]=true
//! ```
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` per factory, cloned into every handle
//! - A missing global (404) is `Ok(None)`, not an error
//! - No client-side deadline; callers race every call

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::cms::init::ClientFactory;
use crate::cms::query::{Condition, FindQuery, Op};
use crate::cms::source::{ContentSource, SharedSource};
use crate::cms::types::{CmsError, CmsResult, Document, FindResult};
use crate::config::schema::CmsConfig;

/// REST client for one CMS instance.
#[derive(Debug, Clone)]
pub struct PayloadSource {
    http: reqwest::Client,
    api_base: Url,
}

impl PayloadSource {
    /// Build the URL for a collection query.
    pub fn find_url(&self, query: &FindQuery) -> CmsResult<Url> {
        let mut url = self.endpoint(&[&query.collection])?;
        {
            let mut pairs = url.query_pairs_mut();
            for condition in &query.conditions {
                let key = format!("where[{}][{}]", condition.field, condition.op.as_str());
                pairs.append_pair(&key, &condition_value(condition));
            }
            for (index, condition) in query.any_of.iter().enumerate() {
                let key = format!("where[or][{index}][{}][{}]", condition.field, condition.op.as_str());
                pairs.append_pair(&key, &condition_value(condition));
            }
            if let Some(sort) = &query.sort {
                pairs.append_pair("sort", sort);
            }
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
            if let Some(depth) = query.depth {
                pairs.append_pair("depth", &depth.to_string());
            }
            for field in &query.select {
                pairs.append_pair(&format!("select[{field}]"), "true");
            }
        }
        Ok(url)
    }

    /// Build the URL for a global document.
    pub fn global_url(&self, slug: &str) -> CmsResult<Url> {
        self.endpoint(&["globals", slug])
    }

    fn endpoint(&self, segments: &[&str]) -> CmsResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| CmsError::Backend(format!("'{}' cannot be a base URL", self.api_base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> CmsResult<Option<Value>> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CmsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

#[async_trait]
impl ContentSource for PayloadSource {
    async fn find(&self, query: &FindQuery) -> CmsResult<FindResult> {
        let url = self.find_url(query)?;
        tracing::trace!(url = %url, "CMS find");
        match self.get_json(url).await? {
            Some(body) => Ok(serde_json::from_value(body)?),
            // Unknown collection.
            None => Ok(FindResult::empty()),
        }
    }

    async fn find_global(&self, slug: &str) -> CmsResult<Option<Document>> {
        let url = self.global_url(slug)?;
        tracing::trace!(url = %url, "CMS findGlobal");
        Ok(self.get_json(url).await?.filter(|doc| !doc.is_null()))
    }

    fn name(&self) -> &'static str {
        "payload"
    }
}

/// Hands out `PayloadSource` handles sharing one connection pool.
#[derive(Debug, Clone)]
pub struct PayloadFactory {
    source: PayloadSource,
}

impl PayloadFactory {
    /// Build the factory from CMS configuration.
    pub fn new(config: &CmsConfig) -> CmsResult<Self> {
        let mut api_base = Url::parse(&config.base_url).map_err(|source| CmsError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        api_base
            .path_segments_mut()
            .map_err(|_| CmsError::Backend(format!("'{}' cannot be a base URL", config.base_url)))?
            .pop_if_empty()
            .push("api");

        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = format!("{} API-Key {}", config.api_key_collection, key);
            let mut value = HeaderValue::from_str(&value)
                .map_err(|e| CmsError::Init(format!("invalid API key header: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("site-content/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            source: PayloadSource { http, api_base },
        })
    }

    /// The handle this factory returns.
    pub fn source(&self) -> &PayloadSource {
        &self.source
    }
}

#[async_trait]
impl ClientFactory for PayloadFactory {
    async fn connect(&self) -> CmsResult<SharedSource> {
        Ok(std::sync::Arc::new(self.source.clone()))
    }

    fn backend(&self) -> &'static str {
        "payload"
    }
}

fn condition_value(condition: &Condition) -> String {
    match (&condition.op, &condition.value) {
        (Op::In, Value::Array(items)) => items
            .iter()
            .map(query_value)
            .collect::<Vec<_>>()
            .join(","),
        (_, value) => query_value(value),
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(base_url: &str) -> PayloadFactory {
        let config = CmsConfig {
            base_url: base_url.to_string(),
            ..CmsConfig::default()
        };
        PayloadFactory::new(&config).unwrap()
    }

    #[test]
    fn test_find_url_encodes_query() {
        let factory = factory("http://cms.local:3001");
        let query = FindQuery::new("services")
            .where_equals("slug", "5-axis-machining")
            .published()
            .sort("order")
            .limit(1)
            .depth(1);
        let url = factory.source().find_url(&query).unwrap();

        assert_eq!(url.path(), "/api/services");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("where[slug][equals]".into(), "5-axis-machining".into())));
        assert!(pairs.contains(&("where[_status][not_equals]".into(), "draft".into())));
        assert!(pairs.contains(&("sort".into(), "order".into())));
        assert!(pairs.contains(&("limit".into(), "1".into())));
        assert!(pairs.contains(&("depth".into(), "1".into())));
    }

    #[test]
    fn test_find_url_select_and_in() {
        let factory = factory("http://cms.local/");
        let query = FindQuery::new("resources")
            .filter("category", Op::In, serde_json::json!(["guides", "case-studies"]))
            .select(["slug", "category"]);
        let url = factory.source().find_url(&query).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("where[category][in]".into(), "guides,case-studies".into())));
        assert!(pairs.contains(&("select[slug]".into(), "true".into())));
        assert!(pairs.contains(&("select[category]".into(), "true".into())));
    }

    #[test]
    fn test_find_url_or_group() {
        let factory = factory("http://cms.local");
        let query = FindQuery::new("resources").published().any_of([
            Condition::new("category", Op::Equals, "case-studies"),
            Condition::new("category.slug", Op::Equals, "case-studies"),
        ]);
        let url = factory.source().find_url(&query).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("where[_status][not_equals]".into(), "draft".into())));
        assert!(pairs.contains(&("where[or][0][category][equals]".into(), "case-studies".into())));
        assert!(pairs.contains(&("where[or][1][category.slug][equals]".into(), "case-studies".into())));
    }

    #[test]
    fn test_global_url_under_base_path() {
        let factory = factory("https://example.com/cms");
        let url = factory.source().global_url("supplier-requirements").unwrap();
        assert_eq!(url.as_str(), "https://example.com/cms/api/globals/supplier-requirements");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = CmsConfig {
            base_url: "not a url".to_string(),
            ..CmsConfig::default()
        };
        let err = PayloadFactory::new(&config).unwrap_err();
        assert!(matches!(err, CmsError::InvalidUrl { .. }));
    }
}
