use crate::assets::AssetLoader;
use crate::rendering::png_codec::DEFAULT_MAX_PIXELS;
use pixel_match::Threshold;
use serde::Deserialize;
use std::path::PathBuf;

/// Multipart per-file limit used by the bundled page as well (5 MiB).
pub const DEFAULT_MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Room for multipart boundaries and the threshold field.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// How the rendered diff reaches the caller
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// `data:image/png;base64,...` URI in the response body
    #[default]
    Inline,
    /// Written to `output_dir`, response carries `/uploads/<name>.png`
    File,
}

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Threshold used when a request does not specify one
    pub default_threshold: f64,

    /// Per-file upload limit in bytes
    pub max_file_bytes: usize,

    /// Largest accepted image area in pixels
    pub max_pixels: u64,

    /// Count anti-aliased pixels as differences
    pub include_anti_aliasing: bool,

    /// Re-compress diff PNGs with oxipng
    pub optimize_png: bool,

    /// Inline data URI or stored file
    pub delivery: DeliveryMode,

    /// Target directory for `delivery: file`
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_threshold: Threshold::DEFAULT.value(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_pixels: DEFAULT_MAX_PIXELS,
            include_anti_aliasing: false,
            optimize_png: false,
            delivery: DeliveryMode::Inline,
            output_dir: PathBuf::from("uploads"),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        default_threshold = config.default_threshold,
                        max_file_bytes = config.max_file_bytes,
                        max_pixels = config.max_pixels,
                        delivery = ?config.delivery,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML, then replace out-of-range values with defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if Threshold::new(self.default_threshold).is_err() {
            tracing::warn!(
                value = self.default_threshold,
                "default_threshold outside [0, 1], using default"
            );
            self.default_threshold = defaults.default_threshold;
        }
        if self.max_file_bytes == 0 {
            tracing::warn!("max_file_bytes is 0, using default");
            self.max_file_bytes = defaults.max_file_bytes;
        }
        if self.max_pixels == 0 {
            tracing::warn!("max_pixels is 0, using default");
            self.max_pixels = defaults.max_pixels;
        }
        self
    }

    /// Threshold for requests that do not send one.
    pub fn default_threshold(&self) -> Threshold {
        Threshold::new(self.default_threshold).unwrap_or_default()
    }

    /// Whole-body limit for the comparison endpoint: two files plus overhead.
    pub fn max_request_bytes(&self) -> usize {
        self.max_file_bytes
            .saturating_mul(2)
            .saturating_add(MULTIPART_OVERHEAD)
    }
}
