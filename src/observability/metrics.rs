//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define content-layer metrics (CMS queries, timeouts, errors, HTTP requests)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `cms_queries_total` (counter): CMS calls by collection, outcome
//! - `cms_query_duration_seconds` (histogram): CMS call latency
//! - `cms_timeouts_total` (counter): calls that lost the race against their deadline
//! - `cms_errors_total` (counter): mapper failures by content type
//! - `http_requests_total` (counter): API requests by method, status
//! - `http_request_duration_seconds` (histogram): API latency
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   exporter every call is a no-op
//! - Labels are low-cardinality: collection names, not slugs

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and its scrape listener.
///
/// Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_timeout() {
    metrics::counter!("cms_timeouts_total").increment(1);
}

pub fn record_cms_query(collection: &str, outcome: &'static str, start: Instant) {
    let collection = collection.to_string();
    metrics::counter!("cms_queries_total", "collection" => collection.clone(), "outcome" => outcome)
        .increment(1);
    metrics::histogram!("cms_query_duration_seconds", "collection" => collection)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_cms_error(content_type: &'static str) {
    metrics::counter!("cms_errors_total", "content_type" => content_type).increment(1);
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    metrics::counter!("http_requests_total", "method" => method.clone(), "status" => status.to_string())
        .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}
