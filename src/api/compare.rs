use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ErrorResponse, ImageSlot};
use crate::models::{AppConfig, ComparisonRequest};
use crate::services::{ComparisonService, DiffDelivery};

/// Successful comparison
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    /// Diff visual: a `data:image/png;base64,...` URI, or `/uploads/<sha256>.png`
    /// when file delivery is configured
    pub diff_image: String,
    /// Number of differing pixels
    pub difference: u64,
    /// Width × height
    pub total_pixels: u64,
    /// Differing share in percent, two decimals (e.g. "25.00")
    pub percent_diff: String,
}

/// Query parameters for the comparison endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CompareQuery {
    /// Matching threshold in [0, 1]; a `threshold` form field takes precedence
    #[serde(default)]
    pub threshold: Option<String>,
}

/// Multipart request layout, for the OpenAPI document only
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CompareForm {
    /// First PNG image
    #[schema(value_type = String, format = Binary)]
    image1: Vec<u8>,
    /// Second PNG image
    #[schema(value_type = String, format = Binary)]
    image2: Vec<u8>,
    /// Matching threshold in [0, 1] (default 0.1)
    threshold: Option<f64>,
}

/// Parts collected from the upload.
#[derive(Default)]
struct Upload {
    image1: Option<Vec<u8>>,
    image2: Option<Vec<u8>>,
    threshold: Option<String>,
}

/// Compare two PNG images
///
/// Both images must have the same dimensions. Returns the number of
/// differing pixels, their percentage and a rendered diff image in which
/// differing pixels are red, anti-aliased pixels yellow and matching pixels
/// a faded grey copy of the first image.
#[utoipa::path(
    post,
    path = "/api/compare",
    request_body(content = CompareForm, content_type = "multipart/form-data"),
    params(CompareQuery),
    responses(
        (status = 200, description = "Comparison result", body = CompareResponse),
        (status = 400, description = "Missing, oversized, undecodable or mismatched images", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Error processing images", body = ErrorResponse),
    ),
    tag = "Compare"
)]
pub async fn handle_compare(
    State(comparator): State<Arc<ComparisonService>>,
    State(delivery): State<Arc<DiffDelivery>>,
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<CompareQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CompareResponse>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::NotMultipart(e.body_text()))?;
    let upload = read_upload(multipart, config.max_file_bytes).await?;

    let image_a = upload.image1.ok_or(ApiError::InputMissing {
        field: ImageSlot::First.field_name(),
    })?;
    let image_b = upload.image2.ok_or(ApiError::InputMissing {
        field: ImageSlot::Second.field_name(),
    })?;

    let given = |raw: &String| !raw.trim().is_empty();
    let threshold = match upload
        .threshold
        .filter(given)
        .or(query.threshold.filter(given))
    {
        Some(raw) => parse_threshold(&raw)?,
        None => config.default_threshold().value(),
    };

    tracing::debug!(
        image1_bytes = image_a.len(),
        image2_bytes = image_b.len(),
        threshold,
        "Comparing images"
    );

    // Decoding and diffing are CPU-bound
    let result = tokio::task::spawn_blocking(move || {
        comparator.compare(&ComparisonRequest::new(&image_a, &image_b, threshold))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Comparison task failed: {e}")))??;

    let diff_image = delivery
        .deliver(&result.diff_png)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to deliver diff image: {e}")))?;

    tracing::info!(
        width = result.width,
        height = result.height,
        differing = result.differing_pixels,
        percent = %result.percent_string(),
        "Comparison complete"
    );

    Ok(Json(CompareResponse {
        percent_diff: result.percent_string(),
        difference: result.differing_pixels,
        total_pixels: result.total_pixels,
        diff_image,
    }))
}

/// Answer a plain `OPTIONS` request.
///
/// CORS preflights never get here; the CORS layer answers them.
pub async fn handle_preflight() -> impl IntoResponse {
    StatusCode::OK
}

/// Any method other than POST/OPTIONS on the comparison endpoint.
pub async fn handle_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Read the multipart body. The first `image1`/`image2`/`threshold` part
/// wins; duplicates and unknown parts are skipped.
async fn read_upload(mut multipart: Multipart, max_file_bytes: usize) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("image1") if upload.image1.is_none() => {
                upload.image1 = Some(read_file(field, "image1", max_file_bytes).await?);
            }
            Some("image2") if upload.image2.is_none() => {
                upload.image2 = Some(read_file(field, "image2", max_file_bytes).await?);
            }
            Some("threshold") if upload.threshold.is_none() => {
                upload.threshold = Some(field.text().await.map_err(multipart_error)?);
            }
            other => {
                tracing::trace!(field = ?other, "Skipping multipart field");
            }
        }
    }

    Ok(upload)
}

/// Buffer one file part, stopping as soon as it passes `max` bytes.
async fn read_file(
    mut field: Field<'_>,
    name: &'static str,
    max: usize,
) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > max {
            return Err(ApiError::FileTooLarge { field: name, max });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::RequestTooLarge
    } else {
        ApiError::InvalidUpload(e.body_text())
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ApiError::InvalidThreshold(format!("threshold must be a number, got {raw:?}")))
}
