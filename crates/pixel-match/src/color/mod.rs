//! Color distance in YIQ space
//!
//! The metric follows Kotsarenko & Ramos, "Measuring perceived color
//! difference using YIQ NTSC transmission color space in mobile
//! applications" (2010). Luma carries roughly half of the weight, which is
//! why a luma-only variant is also exposed for edge detection.

mod yiq;

pub use yiq::{blend, color_delta, gray_value, luma_delta, rgb_to_y, MAX_YIQ_DELTA};
