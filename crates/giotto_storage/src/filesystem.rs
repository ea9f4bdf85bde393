//! Filesystem-based asset storage implementation.
//!
//! This backend stores asset files in a content-addressable filesystem
//! structure, organized by media type and content hash for automatic
//! deduplication. The mapping from action identifier to stored file lives
//! in a process-local index; a restart rebuilds it by re-running the batch
//! against the warm content store.

use crate::{AssetMetadata, AssetStorage, MediaType, StoredAsset};
use giotto_error::{GiottoResult, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Filesystem storage backend.
///
/// Stores asset files in a content-addressable structure:
/// `{base_path}/{type}/{hash[0:2]}/{hash[2:4]}/{hash}`
///
/// # Example Structure
///
/// ```text
/// /var/giotto/assets/
/// ├── image/
/// │   └── ab/
/// │       └── cd/
/// │           └── abcdef123456...  (PNG file)
/// ├── audio/
/// │   └── 12/
/// │       └── 34/
/// │           └── 123456abcdef...  (MP3 file)
/// └── definition/
///     └── ef/
///         └── 01/
///             └── ef0123456789...  (cutscene JSON)
/// ```
///
/// # Features
///
/// - **Content-addressable**: files stored by SHA-256 hash
/// - **Automatic deduplication**: same content = same hash = same file
/// - **Atomic writes**: uses temp file + rename for atomicity
pub struct FileSystemStorage {
    base_path: PathBuf,
    index: RwLock<HashMap<String, StoredAsset>>,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> GiottoResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Created filesystem storage");
        Ok(Self {
            base_path,
            index: RwLock::new(HashMap::new()),
        })
    }

    /// Compute SHA-256 hash of data.
    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    /// Get the filesystem path for a given hash and media type.
    ///
    /// Structure: `{base}/{type}/{hash[0:2]}/{hash[2:4]}/{hash}`
    fn content_path(&self, hash: &str, media_type: MediaType) -> PathBuf {
        self.base_path
            .join(media_type.as_str())
            .join(&hash[0..2])
            .join(&hash[2..4])
            .join(hash)
    }

    /// Verify content hash matches expected hash.
    fn verify_hash(data: &[u8], expected_hash: &str) -> GiottoResult<()> {
        let actual_hash = Self::compute_hash(data);
        if actual_hash != expected_hash {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(format!(
                "Hash mismatch: expected {}, got {}",
                expected_hash, actual_hash
            )))
            .into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AssetStorage for FileSystemStorage {
    #[tracing::instrument(skip(self, data, metadata), fields(asset_id = %metadata.asset_id, size = data.len(), media_type = %metadata.media_type))]
    async fn store(&self, data: &[u8], metadata: &AssetMetadata) -> GiottoResult<StoredAsset> {
        let hash = Self::compute_hash(data);
        let path = self.content_path(&hash, metadata.media_type);

        let asset = StoredAsset {
            id: Uuid::new_v4(),
            asset_id: metadata.asset_id.clone(),
            content_hash: hash.clone(),
            storage_backend: "filesystem".to_string(),
            url: format!("file://{}", path.display()),
            size_bytes: data.len() as i64,
            media_type: metadata.media_type,
            mime_type: metadata.mime_type.clone(),
            duration_seconds: metadata.duration_seconds,
        };

        // If file already exists, just index the reference (deduplication)
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(
                hash = %hash,
                path = %path.display(),
                "Asset content already exists, reusing stored file"
            );
            self.index
                .write()
                .await
                .insert(metadata.asset_id.clone(), asset.clone());
            return Ok(asset);
        }

        // Create parent directories
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            hash = %hash,
            path = %path.display(),
            size = data.len(),
            media_type = %metadata.media_type,
            "Stored asset file"
        );

        self.index
            .write()
            .await
            .insert(metadata.asset_id.clone(), asset.clone());

        Ok(asset)
    }

    #[tracing::instrument(skip(self))]
    async fn retrieve(&self, asset_id: &str) -> GiottoResult<Vec<u8>> {
        let asset = {
            let index = self.index.read().await;
            index
                .get(asset_id)
                .cloned()
                .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(asset_id.to_string())))?
        };

        let path = self.content_path(&asset.content_hash, asset.media_type);
        let data = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(asset_id.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        // Verify content hash
        Self::verify_hash(&data, &asset.content_hash)?;

        tracing::debug!(
            hash = %asset.content_hash,
            path = %path.display(),
            size = data.len(),
            "Retrieved asset file"
        );

        Ok(data)
    }

    async fn url(&self, asset_id: &str) -> GiottoResult<String> {
        let index = self.index.read().await;
        index
            .get(asset_id)
            .map(|asset| asset.url.clone())
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::NotFound(asset_id.to_string())).into()
            })
    }

    async fn duration(&self, asset_id: &str) -> GiottoResult<Option<f64>> {
        let index = self.index.read().await;
        Ok(index.get(asset_id).and_then(|asset| asset.duration_seconds))
    }

    async fn exists(&self, asset_id: &str) -> GiottoResult<bool> {
        Ok(self.index.read().await.contains_key(asset_id))
    }
}

impl std::fmt::Debug for FileSystemStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSystemStorage")
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}
