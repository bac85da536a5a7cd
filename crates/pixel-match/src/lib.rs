//! pixel-match: perceptual per-pixel image comparison
//!
//! This crate compares two equally sized RGBA grids pixel by pixel and
//! renders a third grid that visualises where they differ.
//!
//! # Quick Start
//!
//! ```
//! use pixel_match::{diff, validate, DiffOptions, PixelImage, Threshold};
//!
//! let a = PixelImage::filled(2, 2, [255, 0, 0, 255]).unwrap();
//! let mut b = a.clone();
//! b.set_pixel(1, 1, [0, 0, 255, 255]);
//!
//! let pair = validate(&a, &b).unwrap();
//! let outcome = diff(pair, &DiffOptions::new(Threshold::DEFAULT));
//!
//! assert_eq!(outcome.differing(), 1);
//! assert_eq!(outcome.visual().pixel(1, 1), [255, 0, 0, 255]);
//! ```
//!
//! # Size Checking
//!
//! [`diff()`] only accepts a [`SizedPair`], and the only way to obtain one is
//! through [`validate()`]. Comparing images of different dimensions is
//! therefore rejected before any pixel is touched.
//!
//! # Color Metric
//!
//! Pixels are compared in YIQ space (see [`color`]): the luma channel
//! dominates the weighted distance, which tracks perceived difference far
//! better than raw RGB distance. Semi-transparent pixels are composited onto
//! white first, so a fully transparent pixel compares equal to white.
//!
//! The [`Threshold`] `t` in `[0, 1]` maps to a maximum accepted delta of
//! `35215 · t²`: `0` flags any change, `1` flags nothing.
//!
//! # Diff Visual
//!
//! | Pixel class | Rendered as |
//! |-------------|-------------|
//! | different | opaque red `(255, 0, 0)` |
//! | anti-aliased edge (detection on) | opaque yellow `(255, 255, 0)` |
//! | matching | grey luma of the first image, faded 90% toward white |

pub mod color;
pub mod diff;
pub mod image;
pub mod validate;


pub use diff::{diff, DiffOptions, DiffOutcome, Threshold, ThresholdError};
pub use image::{ImageError, PixelImage};
pub use validate::{validate, DimensionMismatch, SizedPair};
