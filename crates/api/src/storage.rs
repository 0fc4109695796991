//! Object storage for uploaded images.
//!
//! Handlers talk to an [`ObjectStore`]; the server ships with
//! [`LocalObjectStore`], which keeps objects on disk under
//! `<root>/<bucket>/<key>` and serves them through the `/storage` route.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use convex_core::storage::public_url;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The key is empty or would escape the bucket.
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A bucket of publicly addressable objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object, and return
    /// its public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError>;

    /// Remove the object at `key`. Returns `false` when nothing was there.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Public URL an object under `key` resolves at.
    fn public_url(&self, key: &str) -> String;

    fn bucket(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Local filesystem
// ---------------------------------------------------------------------------

/// Stores objects as files under `<root>/<bucket>/`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(
        root: impl Into<PathBuf>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Directory holding the bucket's objects.
    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }

    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('/')
            && key
                .split('/')
                .all(|seg| !seg.is_empty() && seg != "." && seg != "..");
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.bucket_dir().join(Path::new(key)))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(key, path = %path.display(), "Stored object");
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.object_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        public_url(&self.public_base_url, &self.bucket, key)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn store(dir: &tempfile::TempDir) -> LocalObjectStore {
        LocalObjectStore::new(dir.path(), "project-images", "http://localhost:3000/storage")
    }

    #[tokio::test]
    async fn put_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let url = store.put("projects/1.jpg", vec![1, 2, 3]).await.unwrap();

        assert_eq!(url, "http://localhost:3000/storage/project-images/projects/1.jpg");
        let written = std::fs::read(dir.path().join("project-images/projects/1.jpg")).unwrap();
        assert_eq!(written, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn delete_reports_whether_object_existed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.put("products/2.jpg", vec![0]).await.unwrap();

        assert!(store.delete("products/2.jpg").await.unwrap());
        assert!(!store.delete("products/2.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn keys_cannot_escape_the_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        assert_matches!(
            store.put("../outside.jpg", vec![0]).await,
            Err(StorageError::InvalidKey(_))
        );
        assert_matches!(store.delete("/etc/passwd").await, Err(StorageError::InvalidKey(_)));
        assert_matches!(store.delete("").await, Err(StorageError::InvalidKey(_)));
    }
}
