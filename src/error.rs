use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixel_match::{DimensionMismatch, ThresholdError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

/// Message returned for every caller-side decode failure.
pub const DECODE_HINT: &str =
    "Error parsing images. Please ensure both files are valid PNG images.";

/// Generic message for failures the caller cannot fix.
pub const INTERNAL_MESSAGE: &str = "Error processing images";

/// Which of the two uploads an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    First,
    Second,
}

impl ImageSlot {
    /// Multipart field name for this slot.
    pub fn field_name(self) -> &'static str {
        match self {
            ImageSlot::First => "image1",
            ImageSlot::Second => "image2",
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Input is empty")]
    Empty,

    #[error("Invalid PNG data: {0}")]
    Malformed(String),

    #[error("Image too large: {width}x{height} exceeds {max} pixels")]
    TooLarge { width: u32, height: u32, max: u64 },

    #[error("Image exceeds decoder memory limit")]
    LimitsExceeded,

    #[error("Unsupported PNG color layout: {0}")]
    Unsupported(String),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("PNG encode error: {0}")]
    Png(String),
}

/// Failure of one comparison, by pipeline stage.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(#[from] ThresholdError),

    #[error("Failed to decode {slot}: {source}")]
    Decode {
        slot: ImageSlot,
        #[source]
        source: DecodeError,
    },

    #[error("{0}")]
    DimensionMismatch(#[from] DimensionMismatch),

    #[error("Failed to encode diff image: {0}")]
    Encode(#[from] EncodeError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please upload both images")]
    InputMissing { field: &'static str },

    #[error("Please upload both images")]
    NotMultipart(String),

    #[error("Invalid upload")]
    InvalidUpload(String),

    #[error("File too large")]
    FileTooLarge { field: &'static str, max: usize },

    #[error("File too large")]
    RequestTooLarge,

    #[error("Invalid threshold")]
    InvalidThreshold(String),

    #[error("Error parsing images. Please ensure both files are valid PNG images.")]
    Decode { slot: ImageSlot, reason: String },

    #[error("Images must have the same dimensions")]
    DimensionMismatch(DimensionMismatch),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not found")]
    NotFound,

    #[error("Error processing images")]
    Internal(String),
}

impl From<CompareError> for ApiError {
    fn from(e: CompareError) -> Self {
        match e {
            CompareError::InvalidThreshold(e) => ApiError::InvalidThreshold(e.to_string()),
            CompareError::Decode { slot, source } => ApiError::Decode {
                slot,
                reason: source.to_string(),
            },
            CompareError::DimensionMismatch(m) => ApiError::DimensionMismatch(m),
            CompareError::Encode(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InputMissing { .. }
            | ApiError::NotMultipart(_)
            | ApiError::InvalidUpload(_)
            | ApiError::FileTooLarge { .. }
            | ApiError::RequestTooLarge
            | ApiError::InvalidThreshold(_)
            | ApiError::Decode { .. }
            | ApiError::DimensionMismatch(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Extra explanation shown to callers, if any.
    fn details(&self) -> Option<String> {
        match self {
            ApiError::InputMissing { field } => Some(format!("Missing file part: {field}")),
            ApiError::NotMultipart(reason)
            | ApiError::InvalidUpload(reason)
            | ApiError::InvalidThreshold(reason) => {
                Some(reason.clone())
            }
            ApiError::FileTooLarge { field, max } => {
                Some(format!("{field} exceeds the {max} byte limit"))
            }
            ApiError::RequestTooLarge => Some("Request body exceeds the upload limit".into()),
            ApiError::Decode { slot, reason } => Some(format!("{slot}: {reason}")),
            _ => None,
        }
    }

    /// JSON body: `error`, plus `details` / `dimensions` where applicable.
    pub fn body(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            details: self.details(),
            dimensions: match self {
                ApiError::DimensionMismatch(m) => Some(Dimensions {
                    image1: format!("{}x{}", m.width_a, m.height_a),
                    image2: format!("{}x{}", m.width_b, m.height_b),
                }),
                _ => None,
            },
        }
    }
}

/// Error response for the comparison API
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// What exactly was wrong with the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Both sizes, on dimension mismatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// Image sizes as `WxH`
#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct Dimensions {
    pub image1: String,
    pub image2: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(cause) => tracing::error!(%cause, "Comparison failed"),
            _ => tracing::debug!(%status, error = %self, details = ?self.details(), "Rejected request"),
        }

        (status, Json(self.body())).into_response()
    }
}
