//! JSON handlers over the content mappers.
//!
//! Every handler gets a fresh `ContentResolver` from the current `Site`
//! snapshot. Lists always answer 200 (possibly `[]`); single items answer 404
//! `{"error": "not found"}` when the mapper yields nothing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::http::server::AppState;

/// Featured resources returned when the caller gives no limit.
pub const DEFAULT_FEATURED_LIMIT: usize = 3;

fn found<T: Serialize>(value: Option<T>) -> Response {
    match value {
        Some(value) => Json(value).into_response(),
        None => not_found(),
    }
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let site = state.site.load();
    Json(json!({ "status": "ok", "backend": site.backend() }))
}

pub async fn services(State(state): State<AppState>) -> Response {
    Json(state.resolver().get_services().await).into_response()
}

pub async fn service(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    found(state.resolver().get_service_by_slug(&slug).await)
}

pub async fn industries(State(state): State<AppState>) -> Response {
    Json(state.resolver().get_industries().await).into_response()
}

pub async fn industry(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    found(state.resolver().get_industry_by_slug(&slug).await)
}

pub async fn resources(State(state): State<AppState>) -> Response {
    Json(state.resolver().get_resources().await).into_response()
}

#[derive(Debug, Deserialize)]
pub struct FeaturedParams {
    pub limit: Option<usize>,
}

pub async fn featured_resources(
    State(state): State<AppState>,
    Query(params): Query<FeaturedParams>,
) -> Response {
    let limit = params.limit.unwrap_or(DEFAULT_FEATURED_LIMIT);
    Json(state.resolver().get_featured_resources(limit).await).into_response()
}

pub async fn resources_in_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Response {
    Json(state.resolver().get_resources_by_category(&category).await).into_response()
}

pub async fn resource(
    State(state): State<AppState>,
    Path((category, slug)): Path<(String, String)>,
) -> Response {
    found(state.resolver().get_resource(&category, &slug).await)
}

pub async fn paths(State(state): State<AppState>, Path(kind): Path<String>) -> Response {
    let resolver = state.resolver();
    match kind.as_str() {
        "services" => Json(resolver.get_all_service_slugs().await).into_response(),
        "industries" => Json(resolver.get_all_industry_slugs().await).into_response(),
        "resources" => Json(resolver.get_all_resource_paths().await).into_response(),
        _ => not_found(),
    }
}

pub async fn page(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let resolver = state.resolver();
    match name.as_str() {
        "homepage" => found(resolver.get_homepage().await),
        "navigation" => found(resolver.get_navigation().await),
        "footer" => found(resolver.get_footer().await),
        "about" => found(resolver.get_about().await),
        "contact" => found(resolver.get_contact().await),
        "careers" => found(resolver.get_careers().await),
        "terms" => found(resolver.get_terms().await),
        "supplier-requirements" => found(resolver.get_supplier_requirements().await),
        _ => not_found(),
    }
}
