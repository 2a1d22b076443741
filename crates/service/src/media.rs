//! Uploaded files under the media root, addressed by public URL.

use std::path::PathBuf;

use models::errors::FieldErrors;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub const PROFILE_PHOTO_DIR: &str = "profile_photos";
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
pub const EMPTY_FILE: &str = "The submitted file is empty.";
pub const NOT_AN_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid upload: {0}")]
    Invalid(FieldErrors),
    #[error("media io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self { root: root.into(), url_prefix: url_prefix.trim_end_matches('/').to_string() }
    }

    pub fn from_config(cfg: &configs::MediaConfig) -> Self {
        Self::new(&cfg.root, &cfg.url_prefix)
    }

    pub fn root(&self) -> &PathBuf { &self.root }

    /// Store an uploaded photo for `field` and return its public URL.
    pub async fn save_image(&self, field: &str, file_name: Option<&str>, bytes: &[u8]) -> Result<String, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Invalid(FieldErrors::single(field, EMPTY_FILE)));
        }
        let ext = file_name
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| MediaError::Invalid(FieldErrors::single(field, NOT_AN_IMAGE)))?;

        let relative = format!("{}/{}.{}", PROFILE_PHOTO_DIR, Uuid::new_v4().simple(), ext);
        let dir = self.root.join(PROFILE_PHOTO_DIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(self.root.join(&relative), bytes).await?;
        info!(path = %relative, size = bytes.len(), "media_stored");
        Ok(format!("{}/{}", self.url_prefix, relative))
    }

    /// Remove a file returned by [`Self::save_image`]; URLs outside the photo directory are ignored.
    pub async fn discard(&self, url: &str) {
        let Some(relative) = url.strip_prefix(self.url_prefix.as_str()).and_then(|r| r.strip_prefix('/')) else {
            return;
        };
        if !relative.starts_with(PROFILE_PHOTO_DIR) || relative.split('/').any(|seg| seg == "..") {
            return;
        }
        match tokio::fs::remove_file(self.root.join(relative)).await {
            Ok(()) => info!(path = %relative, "media_discarded"),
            Err(e) => warn!(path = %relative, error = %e, "media discard failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (MediaStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("hall_media_{}", Uuid::new_v4().simple()));
        (MediaStore::new(&root, "/media/"), root)
    }

    #[tokio::test]
    async fn stores_image_and_returns_url() {
        let (store, root) = temp_store();
        let url = store.save_image("photo", Some("Me.PNG"), b"\x89PNG....").await.unwrap();
        assert!(url.starts_with("/media/profile_photos/"));
        assert!(url.ends_with(".png"));
        let on_disk = root.join(url.trim_start_matches("/media/"));
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), b"\x89PNG....");
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn discard_removes_stored_file_only() {
        let (store, root) = temp_store();
        let url = store.save_image("photo", Some("a.jpg"), b"jpeg").await.unwrap();
        let on_disk = root.join(url.trim_start_matches("/media/"));
        store.discard("/media/profile_photos/../../etc/passwd").await;
        store.discard("/elsewhere/profile_photos/a.jpg").await;
        assert!(tokio::fs::metadata(&on_disk).await.is_ok());
        store.discard(&url).await;
        assert!(tokio::fs::metadata(&on_disk).await.is_err());
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn rejects_empty_and_non_images() {
        let (store, _root) = temp_store();
        let empty = store.save_image("photo", Some("a.png"), b"").await.unwrap_err();
        assert!(matches!(empty, MediaError::Invalid(f) if f.get("photo") == Some(&[EMPTY_FILE.to_string()][..])));
        let text = store.save_image("photo", Some("notes.txt"), b"hello").await.unwrap_err();
        assert!(matches!(text, MediaError::Invalid(_)));
        let nameless = store.save_image("photo", None, b"hello").await.unwrap_err();
        assert!(matches!(nameless, MediaError::Invalid(_)));
    }
}
