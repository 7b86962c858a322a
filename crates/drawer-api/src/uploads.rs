//! On-disk upload store.
//!
//! Stored names are server-generated (UUIDv7 plus the sanitized original
//! extension), so client-supplied names never touch the filesystem.
//! Writes are atomic (temp file + rename) to avoid serving torn files.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use drawer_core::defaults::UPLOAD_URL_PREFIX;
use drawer_core::{file_safety, Error, Result};

/// A stored upload.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Generated file name (no directories).
    pub file_name: String,
    /// Public URL (`/uploads/{file_name}`).
    pub file_url: String,
    /// Absolute or working-directory-relative path on disk.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: i64,
}

/// Filesystem-backed upload store.
pub struct UploadStore {
    base_dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The directory uploads are written to.
    pub fn dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the upload directory if it does not exist and verify it is
    /// writable with a write/read/delete round trip.
    pub async fn ensure_ready(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;

        let probe = self.base_dir.join(".health-check");
        fs::write(&probe, b"upload-store-health-check").await?;
        let read_back = fs::read(&probe).await?;
        if read_back != b"upload-store-health-check" {
            return Err(Error::Internal(
                "upload store read-back mismatch".to_string(),
            ));
        }
        fs::remove_file(&probe).await?;
        Ok(())
    }

    /// Store file bytes under a generated name, returning its location.
    pub async fn store(&self, original_filename: &str, data: &[u8]) -> Result<StoredFile> {
        let file_name = match file_safety::safe_extension(original_filename) {
            Some(ext) => format!("{}.{}", Uuid::now_v7(), ext),
            None => Uuid::now_v7().to_string(),
        };
        let path = self.base_dir.join(&file_name);

        // Atomic write: temp file + rename.
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, &path).await?;

        debug!(
            subsystem = "uploads",
            file_name = %file_name,
            file_size = data.len(),
            "upload stored"
        );

        Ok(StoredFile {
            file_url: format!("{}/{}", UPLOAD_URL_PREFIX, file_name),
            path,
            size: data.len() as i64,
            file_name,
        })
    }

    /// Delete the file behind a `/uploads/...` URL. Missing files and
    /// foreign URLs are ignored — document deletion must not fail because
    /// the artifact is already gone.
    pub async fn delete_by_url(&self, file_url: &str) -> Result<()> {
        let Some(file_name) = file_url.strip_prefix(&format!("{}/", UPLOAD_URL_PREFIX)) else {
            return Ok(());
        };
        // Reject anything that could escape the upload directory.
        if file_name.contains('/') || file_name.contains("..") {
            return Ok(());
        }
        let path = self.base_dir.join(file_name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(
                    subsystem = "uploads",
                    path = %path.display(),
                    error = %e,
                    "failed to delete stored file"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        store.ensure_ready().await.unwrap();

        let stored = store.store("receipt.pdf", b"%PDF-1.4 test").await.unwrap();
        assert!(stored.file_name.ends_with(".pdf"));
        assert_eq!(stored.file_url, format!("/uploads/{}", stored.file_name));
        assert_eq!(stored.size, 13);
        assert_eq!(fs::read(&stored.path).await.unwrap(), b"%PDF-1.4 test");

        store.delete_by_url(&stored.file_url).await.unwrap();
        assert!(!stored.path.exists());
    }

    #[tokio::test]
    async fn test_generated_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        store.ensure_ready().await.unwrap();

        let a = store.store("a.png", b"one").await.unwrap();
        let b = store.store("a.png", b"two").await.unwrap();
        assert_ne!(a.file_name, b.file_name);
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        store.ensure_ready().await.unwrap();
        store.delete_by_url("/uploads/gone.pdf").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_ignores_foreign_and_traversal_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        store.ensure_ready().await.unwrap();

        store.delete_by_url("https://example.com/x.pdf").await.unwrap();
        store.delete_by_url("/uploads/../secrets.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_filename_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());
        store.ensure_ready().await.unwrap();

        let stored = store.store("scan", b"bytes").await.unwrap();
        assert!(!stored.file_name.contains('.'));
    }
}
