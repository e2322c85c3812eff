//! Operational HTTP endpoints.

use crate::responses::{ok, ApiResult, InvalidationResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use catalog_cache::{CacheManager, CacheStats};
use catalog_config::ServerConfig;
use catalog_core::CatalogError;
use std::sync::Arc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheManager>,
}

impl AppState {
    #[must_use]
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }
}

/// Creates the application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/cache/stats", get(cache_stats))
        .route("/cache/products/:id", delete(invalidate_product))
        .route("/cache/patterns/:pattern", delete(invalidate_pattern))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Router created with health and cache endpoints");
    router
}

/// 200 `ok` when the store answers a ping, 503 otherwise.
async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    if state.cache.is_healthy().await {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.get_stats().await)
}

async fn invalidate_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<InvalidationResponse> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CatalogError::validation("product id must not be empty").into());
    }

    let deleted = state.cache.invalidate_product_caches(id).await;
    ok(InvalidationResponse { deleted })
}

/// Pattern is relative to the namespace, e.g. `search:*`.
async fn invalidate_pattern(
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> ApiResult<InvalidationResponse> {
    if pattern.trim().is_empty() {
        return Err(CatalogError::validation("pattern must not be empty").into());
    }

    let deleted = state.cache.del_pattern(&pattern).await;
    info!(pattern = %pattern, deleted, "Pattern invalidated");
    ok(InvalidationResponse { deleted })
}
