use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::{content_type, AssetLoader};
use crate::error::ApiError;

/// Serve the comparison page
pub async fn handle_index(State(assets): State<Arc<AssetLoader>>) -> Result<Response, ApiError> {
    serve_asset(&assets, PathBuf::from("index.html"))
}

/// Serve a page asset (`/static/script.js`, `/static/styles.css`, ...)
pub async fn handle_static(
    State(assets): State<Arc<AssetLoader>>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    serve_asset(&assets, PathBuf::from(path))
}

fn serve_asset(assets: &AssetLoader, path: PathBuf) -> Result<Response, ApiError> {
    let bytes = assets.read_static(&path).map_err(|e| {
        tracing::debug!(path = %path.display(), %e, "Static asset not found");
        ApiError::NotFound
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type(&path)),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        bytes.into_owned(),
    )
        .into_response())
}

/// JSON 404 for unknown routes
pub async fn handle_not_found() -> ApiError {
    ApiError::NotFound
}
