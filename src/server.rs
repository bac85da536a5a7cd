//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header::CACHE_CONTROL, HeaderValue},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::api::{self, CompareQuery, CompareResponse};
use crate::assets::AssetLoader;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::diff_store::UPLOADS_ROUTE;
use crate::services::{ComparisonService, DiffDelivery};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub comparator: Arc<ComparisonService>,
    pub delivery: Arc<DiffDelivery>,
    pub assets: Arc<AssetLoader>,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = AppConfig::load_from_assets(&asset_loader);
    create_app_state_with_config(asset_loader, config)
}

/// Create application state with an explicit configuration.
pub fn create_app_state_with_config(
    asset_loader: Arc<AssetLoader>,
    config: AppConfig,
) -> anyhow::Result<AppState> {
    let delivery = DiffDelivery::from_config(&config).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create output directory {}: {e}",
            config.output_dir.display()
        )
    })?;
    let comparator = ComparisonService::new(&config);

    Ok(AppState {
        config: Arc::new(config),
        comparator: Arc::new(comparator),
        delivery: Arc::new(delivery),
        assets: asset_loader,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
/// Every route, including errors, carries permissive CORS headers.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_request_bytes();
    let uploads_dir = state.delivery.serve_dir().map(ToOwned::to_owned);

    let compare = post(handle_compare)
        .options(api::handle_preflight)
        .fallback(api::handle_method_not_allowed)
        .layer(
            ServiceBuilder::new()
                // Results depend on the uploaded bodies
                .layer(SetResponseHeaderLayer::overriding(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ))
                .layer(DefaultBodyLimit::max(body_limit)),
        );

    let mut router = Router::new()
        // Comparison API
        .route("/api/compare", compare)
        // Browser page
        .route("/", get(handle_index))
        .route("/static/*path", get(handle_static))
        // Health check
        .route("/health", get(|| async { "OK" }));

    if let Some(dir) = uploads_dir {
        router = router.nest_service(UPLOADS_ROUTE, ServeDir::new(dir));
    }

    router
        .fallback(api::handle_not_found)
        // Add state and tracing
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_compare(
    State(state): State<AppState>,
    query: Query<CompareQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CompareResponse>, ApiError> {
    api::handle_compare(
        State(state.comparator),
        State(state.delivery),
        State(state.config),
        query,
        multipart,
    )
    .await
}

async fn handle_index(State(state): State<AppState>) -> Result<Response, ApiError> {
    api::handle_index(State(state.assets)).await
}

async fn handle_static(
    State(state): State<AppState>,
    path: Path<String>,
) -> Result<Response, ApiError> {
    api::handle_static(State(state.assets), path).await
}
