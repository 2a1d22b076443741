//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the media root exists and is a directory; create it when missing.
pub async fn ensure_media_root(media_root: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(media_root).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{} exists but is not a directory", media_root.display())),
        Err(_) => {
            warn!(media_root = %media_root.display(), "media directory not found; creating it");
            tokio::fs::create_dir_all(media_root)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", media_root.display()))?;
            info!(media_root = %media_root.display(), "media directory created");
            Ok(())
        }
    }
}
