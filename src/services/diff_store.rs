use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{AppConfig, DeliveryMode};

/// URL prefix under which stored diffs are served.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Where a rendered diff PNG goes once a comparison succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffDelivery {
    /// Embed the PNG in the response as a data URI
    Inline,
    /// Write the PNG into `dir` and hand back its URL
    File { dir: PathBuf },
}

impl DiffDelivery {
    /// Build from config, creating the output directory for file delivery.
    pub fn from_config(config: &AppConfig) -> io::Result<Self> {
        match config.delivery {
            DeliveryMode::Inline => Ok(DiffDelivery::Inline),
            DeliveryMode::File => {
                std::fs::create_dir_all(&config.output_dir)?;
                tracing::warn!(
                    dir = %config.output_dir.display(),
                    "File delivery is deprecated, diffs accumulate on disk"
                );
                Ok(DiffDelivery::File {
                    dir: config.output_dir.clone(),
                })
            }
        }
    }

    /// Directory to serve under [`UPLOADS_ROUTE`], if any.
    pub fn serve_dir(&self) -> Option<&Path> {
        match self {
            DiffDelivery::Inline => None,
            DiffDelivery::File { dir } => Some(dir),
        }
    }

    /// Turn diff PNG bytes into the `diffImage` value of a response.
    pub async fn deliver(&self, png_bytes: &[u8]) -> io::Result<String> {
        match self {
            DiffDelivery::Inline => Ok(data_uri(png_bytes)),
            DiffDelivery::File { dir } => {
                let hash = content_hash(png_bytes);
                let name = format!("{hash}.png");
                let path = dir.join(&name);
                write_atomically(dir, &hash, &path, png_bytes).await?;
                tracing::debug!(path = %path.display(), "Stored diff image");
                Ok(format!("{UPLOADS_ROUTE}/{name}"))
            }
        }
    }
}

/// Write to a private temp file in `dir`, then rename over `path`.
///
/// Readers only ever see a complete file, and a torn earlier write under the
/// same name is replaced rather than trusted.
async fn write_atomically(dir: &Path, hash: &str, path: &Path, bytes: &[u8]) -> io::Result<()> {
    static NEXT_TEMP: AtomicU64 = AtomicU64::new(0);
    let temp = dir.join(format!(
        ".{hash}.{}.{}.tmp",
        std::process::id(),
        NEXT_TEMP.fetch_add(1, Ordering::Relaxed)
    ));

    if let Err(e) = tokio::fs::write(&temp, bytes).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e);
    }
    Ok(())
}

/// `data:image/png;base64,...`
pub fn data_uri(png_bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes))
}

fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
