//! Per-pixel comparison of a validated image pair.
//!
//! See the crate docs for the diff visual convention.

mod antialias;

use std::fmt;

use crate::color::{color_delta, gray_value, MAX_YIQ_DELTA};
use crate::image::{PixelImage, CHANNELS};
use crate::validate::SizedPair;

use antialias::antialiased;

/// Color painted over pixels classified as different.
pub const DIFF_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Color painted over differences suppressed as anti-aliasing.
pub const AA_COLOR: [u8; 4] = [255, 255, 0, 255];

/// Opacity of the first image's luma in matching pixels.
pub const MATCH_ALPHA: f64 = 0.1;

/// Error for out-of-range threshold values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdError(pub f64);

impl fmt::Display for ThresholdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "threshold must be between 0 and 1, got {}", self.0)
    }
}

impl std::error::Error for ThresholdError {}

/// Matching sensitivity in `[0, 1]`.
///
/// `0` requires an exact match; `1` accepts every pixel.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(0.1);

    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ThresholdError(value))
        }
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Largest color delta still considered a match.
    #[inline]
    pub fn max_delta(self) -> f64 {
        MAX_YIQ_DELTA * self.0 * self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Threshold {
    type Error = ThresholdError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Comparison settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffOptions {
    threshold: Threshold,
    include_anti_aliasing: bool,
}

impl DiffOptions {
    /// Options at `threshold`; anti-aliased pixels are detected and not counted.
    pub fn new(threshold: Threshold) -> Self {
        Self {
            threshold,
            include_anti_aliasing: false,
        }
    }

    /// `true` counts anti-aliased pixels as differences; `false` (the default)
    /// detects them and leaves them out of the count.
    #[inline]
    pub fn include_anti_aliasing(mut self, include: bool) -> Self {
        self.include_anti_aliasing = include;
        self
    }

    #[inline]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    #[inline]
    pub fn includes_anti_aliasing(&self) -> bool {
        self.include_anti_aliasing
    }
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self::new(Threshold::DEFAULT)
    }
}

/// Result of [`diff()`]: the visual and the differing pixel count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    visual: PixelImage,
    differing: u64,
}

impl DiffOutcome {
    pub fn visual(&self) -> &PixelImage {
        &self.visual
    }

    /// Number of pixels classified as different.
    pub fn differing(&self) -> u64 {
        self.differing
    }

    pub fn into_parts(self) -> (PixelImage, u64) {
        (self.visual, self.differing)
    }
}

/// Compare a validated pair pixel by pixel.
///
/// Runs sequentially in row-major order; identical inputs and options always
/// produce identical output.
pub fn diff(pair: SizedPair<'_>, options: &DiffOptions) -> DiffOutcome {
    let width = pair.width() as usize;
    let height = pair.height() as usize;
    let a = pair.first().as_rgba();
    let b = pair.second().as_rgba();
    let max_delta = options.threshold.max_delta();
    let identical = a == b;

    let mut out = vec![0u8; a.len()];
    let mut differing = 0u64;

    for y in 0..height {
        for x in 0..width {
            let pos = (y * width + x) * CHANNELS;
            let pa = rgba_at(a, pos);
            let delta = if identical {
                0.0
            } else {
                color_delta(pa, rgba_at(b, pos))
            };

            let marker = if delta.abs() > max_delta {
                if !options.include_anti_aliasing
                    && (antialiased(a, x, y, width, height, b)
                        || antialiased(b, x, y, width, height, a))
                {
                    AA_COLOR
                } else {
                    differing += 1;
                    DIFF_COLOR
                }
            } else {
                let v = gray_value(pa, MATCH_ALPHA);
                [v, v, v, 255]
            };
            out[pos..pos + CHANNELS].copy_from_slice(&marker);
        }
    }

    let visual = PixelImage::from_parts_unchecked(pair.width(), pair.height(), out);

    DiffOutcome { visual, differing }
}

#[inline]
pub(crate) fn rgba_at(buf: &[u8], pos: usize) -> [u8; 4] {
    [buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]]
}
