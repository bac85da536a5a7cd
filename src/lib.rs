//! pixdiff - visual difference service for pairs of PNG images
//!
//! Accepts two uploaded PNGs, checks that their dimensions match, counts the
//! differing pixels with [`pixel_match`] and renders a diff image.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
