//! Asset loading with embedded fallbacks
//!
//! This module provides a unified interface for loading the browser page and
//! the default configuration with the following behavior:
//!
//! - If an env var is NOT set: use embedded assets only (no filesystem access)
//! - If an env var IS set: use the filesystem, falling back to embedded files
//!   that are missing there

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Embedded browser page (HTML, script, stylesheet)
#[derive(RustEmbed)]
#[folder = "public/"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.png"]
#[include = "*.svg"]
#[include = "*.ico"]
struct EmbeddedPublic;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Public,
    Config,
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External static directory (from STATIC_DIR env var)
    static_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    /// If `None`, embedded assets are used exclusively.
    pub fn new(static_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            static_dir,
            config_file,
        }
    }

    /// Read a page asset (`index.html`, `script.js`, ...)
    ///
    /// Paths that try to leave the asset root are rejected as not found.
    pub fn read_static(&self, relative_path: &Path) -> io::Result<Cow<'static, [u8]>> {
        if !is_plain_relative(relative_path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Asset not found: {}", relative_path.display()),
            ));
        }

        if let Some(ref dir) = self.static_dir {
            let full_path = dir.join(relative_path);
            if full_path.is_file() {
                tracing::trace!(path = %full_path.display(), "Loading asset from filesystem");
                return Ok(Cow::Owned(fs::read(&full_path)?));
            }
        }

        let path_str = relative_path.to_string_lossy().replace('\\', "/");
        EmbeddedPublic::get(&path_str)
            .map(|f| {
                tracing::trace!(path = %path_str, "Loading asset from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Asset not found: {path_str}"),
                )
            })
    }

    /// List all available page assets (merged view of embedded + external)
    pub fn list_static(&self) -> Vec<String> {
        let mut files: HashSet<String> = EmbeddedPublic::iter().map(|s| s.to_string()).collect();

        if let Some(ref dir) = self.static_dir {
            if let Ok(entries) = fs::read_dir(dir) {
                for entry in entries.flatten() {
                    if entry.path().is_file() {
                        if let Some(name) = entry.file_name().to_str() {
                            files.insert(name.to_string());
                        }
                    }
                }
            }
        }

        let mut result: Vec<_> = files.into_iter().collect();
        result.sort();
        result
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get("config.yaml")
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
            })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Extract embedded assets to filesystem (init command)
    ///
    /// Uses the configured paths (or defaults if not set).
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            match category {
                AssetCategory::Public => {
                    let dir = self
                        .static_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./public"));
                    fs::create_dir_all(&dir)?;

                    for file in EmbeddedPublic::iter() {
                        let path = dir.join(file.as_ref());
                        if !force && path.exists() {
                            report.skipped.push(path.display().to_string());
                            continue;
                        }
                        if let Some(data) = EmbeddedPublic::get(&file) {
                            fs::write(&path, &*data.data)?;
                            report.written.push(path.display().to_string());
                        }
                    }
                }
                AssetCategory::Config => {
                    let path = self
                        .config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./config.yaml"));

                    if !force && path.exists() {
                        report.skipped.push(path.display().to_string());
                        continue;
                    }
                    if let Some(parent) = path.parent() {
                        if !parent.as_os_str().is_empty() {
                            fs::create_dir_all(parent)?;
                        }
                    }
                    if let Some(data) = EmbeddedConfig::get("config.yaml") {
                        fs::write(&path, &*data.data)?;
                        report.written.push(path.display().to_string());
                    }
                }
            }
        }

        Ok(report)
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Public => {
                let mut files: Vec<_> = EmbeddedPublic::iter().map(|s| s.to_string()).collect();
                files.sort();
                files
            }
            AssetCategory::Config => vec!["config.yaml".to_string()],
        }
    }
}

/// MIME type for a page asset, by extension.
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Only `Normal` components: no root, no `..`, no prefix.
fn is_plain_relative(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_page_present() {
        let loader = AssetLoader::new(None, None);
        let html = loader.read_static(Path::new("index.html")).unwrap();
        assert!(String::from_utf8_lossy(&html).contains("uploadForm"));
        assert!(loader.read_static(Path::new("script.js")).is_ok());
        assert!(loader.read_static(Path::new("styles.css")).is_ok());
    }

    #[test]
    fn test_missing_asset() {
        let loader = AssetLoader::new(None, None);
        let err = loader.read_static(Path::new("nope.js")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_traversal_rejected() {
        let loader = AssetLoader::new(None, None);
        assert!(loader.read_static(Path::new("../Cargo.toml")).is_err());
        assert!(loader.read_static(Path::new("/etc/passwd")).is_err());
        assert!(loader.read_static(Path::new("")).is_err());
    }

    #[test]
    fn test_filesystem_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<p>custom</p>").unwrap();
        let loader = AssetLoader::new(Some(dir.path().to_path_buf()), None);

        let html = loader.read_static(Path::new("index.html")).unwrap();
        assert_eq!(&*html, b"<p>custom</p>");
        // Not overridden: falls back to embedded
        assert!(loader.read_static(Path::new("script.js")).is_ok());
    }

    #[test]
    fn test_list_static_merges() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("extra.css"), "").unwrap();
        let loader = AssetLoader::new(Some(dir.path().to_path_buf()), None);
        let files = loader.list_static();
        assert!(files.contains(&"extra.css".to_string()));
        assert!(files.contains(&"index.html".to_string()));
    }

    #[test]
    fn test_embedded_config_readable() {
        let loader = AssetLoader::new(None, None);
        let config = loader.read_config_string().unwrap();
        assert!(config.contains("default_threshold"));
    }

    #[test]
    fn test_init_writes_then_skips() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("public");
        let config = dir.path().join("conf/config.yaml");
        let loader = AssetLoader::new(Some(public.clone()), Some(config.clone()));

        let report = loader
            .init(&[AssetCategory::Public, AssetCategory::Config], false)
            .unwrap();
        assert!(public.join("index.html").exists());
        assert!(config.exists());
        assert_eq!(
            report.written.len(),
            AssetLoader::list_embedded(AssetCategory::Public).len() + 1
        );

        let again = loader.init(&[AssetCategory::Config], false).unwrap();
        assert!(again.written.is_empty());
        assert_eq!(again.skipped.len(), 1);

        let forced = loader.init(&[AssetCategory::Config], true).unwrap();
        assert_eq!(forced.written.len(), 1);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("a/b.css")), "text/css; charset=utf-8");
        assert_eq!(content_type(Path::new("blob")), "application/octet-stream");
    }
}
