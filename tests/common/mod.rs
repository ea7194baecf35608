//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use site_content::cms::{MemorySource, StaticFactory};
use site_content::config::schema::{CmsBackend, SiteConfig};
use site_content::Site;

/// What the mock CMS answers for one request.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockResponse {
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: json!({ "errors": [{ "message": "mock" }] }).to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A running mock CMS.
pub struct MockCms {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockCms {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request targets (path plus query string) seen so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a programmable mock CMS on an ephemeral port.
///
/// The handler receives the decoded request target, e.g. `/api/services?limit=1`.
pub async fn start_mock_cms<F>(handler: F) -> MockCms
where
    F: Fn(&str) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let seen = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let handler = handler.clone();
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        let mut reader = BufReader::new(socket);
                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        // Drain headers; the CMS API only takes GETs.
                        loop {
                            let mut line = String::new();
                            match reader.read_line(&mut line).await {
                                Ok(0) => break,
                                Ok(_) if line == "\r\n" || line == "\n" => break,
                                Ok(_) => continue,
                                Err(_) => return,
                            }
                        }

                        let target = request_line
                            .split_whitespace()
                            .nth(1)
                            .map(decode)
                            .unwrap_or_default();
                        seen.lock().unwrap().push(target.clone());

                        let response = handler(&target);
                        if !response.delay.is_zero() {
                            tokio::time::sleep(response.delay).await;
                        }

                        let status_text = match response.status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            response.body.len(),
                            response.body
                        );
                        let mut socket = reader.into_inner();
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockCms { addr, requests }
}

/// Decode a request target so tests can match on readable text.
fn decode(target: &str) -> String {
    let Ok(url) = url::Url::parse(&format!("http://mock{target}")) else {
        return target.to_string();
    };
    let pairs: Vec<String> = url.query_pairs().map(|(k, v)| format!("{k}={v}")).collect();
    if pairs.is_empty() {
        url.path().to_string()
    } else {
        format!("{}?{}", url.path(), pairs.join("&"))
    }
}

/// A configuration that talks to the mock CMS.
pub fn payload_config(base_url: &str, timeout_ms: u64) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.cms.backend = CmsBackend::Payload;
    config.cms.base_url = base_url.to_string();
    config.cms.timeout_ms = timeout_ms;
    config
}

/// A site backed by in-process documents.
pub fn memory_site(source: MemorySource) -> (SiteConfig, Site) {
    let mut config = SiteConfig::default();
    config.cms.backend = CmsBackend::Memory;
    let factory = Arc::new(StaticFactory::new(Arc::new(source)));
    let site = Site::new(factory, &config);
    (config, site)
}

/// A small catalog covering every collection and global the API serves.
pub fn catalog() -> MemorySource {
    MemorySource::new()
        .with_docs(
            "services",
            vec![
                json!({
                    "title": "5-Axis Machining",
                    "slug": "5-axis-machining",
                    "shortDescription": "Complex geometry in one setup.",
                    "order": 1
                }),
                json!({ "title": "Metrology", "slug": "metrology", "order": 2 }),
            ],
        )
        .with_docs(
            "industries",
            vec![json!({ "title": "Aerospace", "slug": "aerospace", "order": 1 })],
        )
        .with_docs(
            "resources",
            vec![json!({
                "title": "Tolerance Guide",
                "slug": "tolerance-guide",
                "category": "guides",
                "featured": true,
                "publishedDate": "2026-01-10"
            })],
        )
        .with_global("homepage", json!({ "hero": { "heading": "Precision at scale" } }))
}
