use axum::{
    Json, Router,
    extract::{RawQuery as QueryString, State},
    routing::get,
};
use chrono::Utc;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::core::SearchStore;
use crate::errors::{ApiError, ErrorResponse};
use crate::filtering::RawQuery;
use crate::models::{HealthResponse, SearchParams, SearchResponse};
use crate::openapi::ApiDoc;
use crate::operations::search_restaurants;

/// Value reported in the `service` field of `GET /health`
pub const SERVICE_NAME: &str = "api";

/// Shared handler state: the store, connected once at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SearchStore>,
}

impl AppState {
    pub fn new(store: impl SearchStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build the application router with request tracing
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(search))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/search",
    tag = "search",
    params(SearchParams),
    responses(
        (status = 200, description = "One page of matching restaurants", body = SearchResponse),
        (status = 422, description = "One or more parameters were rejected", body = ErrorResponse),
        (status = 500, description = "The search could not be completed", body = ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    QueryString(query): QueryString,
) -> Result<Json<SearchResponse>, ApiError> {
    let raw = query
        .as_deref()
        .map(RawQuery::from_query_string)
        .unwrap_or_default();
    let response = search_restaurants(state.store.as_ref(), &raw).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME.to_string(),
        ts: Utc::now().timestamp_millis(),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
