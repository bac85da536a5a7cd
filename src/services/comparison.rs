use pixel_match::{diff, validate, DiffOptions, Threshold};

use crate::error::{CompareError, ImageSlot};
use crate::models::{AppConfig, ComparisonRequest, ComparisonResult};
use crate::rendering::{decode_png, encode_png, optimize_png, DecodeLimits};

/// Decode, validate, diff and encode one pair of uploads.
///
/// Holds only immutable settings, so one instance is shared by every request
/// and [`compare`](Self::compare) may run on any number of threads at once.
/// Performs no I/O; the transport decides where the diff PNG goes.
#[derive(Debug, Clone)]
pub struct ComparisonService {
    limits: DecodeLimits,
    include_anti_aliasing: bool,
    optimize: bool,
}

impl ComparisonService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            limits: DecodeLimits::new(config.max_pixels),
            include_anti_aliasing: config.include_anti_aliasing,
            optimize: config.optimize_png,
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// Fails on the first stage that rejects the input, in order: threshold,
    /// first image, second image, dimensions, encoding.
    pub fn compare(&self, request: &ComparisonRequest<'_>) -> Result<ComparisonResult, CompareError> {
        let threshold = Threshold::new(request.threshold)?;

        let first = decode_png(request.image_a, &self.limits).map_err(|source| {
            CompareError::Decode {
                slot: ImageSlot::First,
                source,
            }
        })?;
        let second = decode_png(request.image_b, &self.limits).map_err(|source| {
            CompareError::Decode {
                slot: ImageSlot::Second,
                source,
            }
        })?;

        let pair = validate(&first, &second)?;
        let options = DiffOptions::new(threshold).include_anti_aliasing(self.include_anti_aliasing);
        let (width, height) = (pair.width(), pair.height());
        let (visual, differing_pixels) = diff(pair, &options).into_parts();

        let mut diff_png = encode_png(&visual)?;
        if self.optimize {
            diff_png = optimize_png(diff_png);
        }

        Ok(ComparisonResult {
            width,
            height,
            differing_pixels,
            total_pixels: u64::from(width) * u64::from(height),
            diff_png,
        })
    }
}
