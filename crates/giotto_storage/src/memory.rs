//! In-memory asset storage implementation.
//!
//! The default backend for tests and for running the pipeline against
//! simulated generation backends. Assets live in a process-local map and
//! are addressed as `memory://{type}/{hash}`.

use crate::{AssetMetadata, AssetStorage, StoredAsset};
use giotto_error::{GiottoResult, StorageError, StorageErrorKind};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

struct MemoryEntry {
    asset: StoredAsset,
    data: Vec<u8>,
}

/// In-memory storage backend.
///
/// # Example
///
/// ```
/// use giotto_storage::{AssetMetadata, AssetStorage, MediaType, MemoryStorage};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let storage = MemoryStorage::new();
/// let metadata = AssetMetadata {
///     asset_id: "narration".to_string(),
///     media_type: MediaType::Audio,
///     mime_type: "audio/mpeg".to_string(),
///     duration_seconds: Some(4.2),
/// };
/// storage.store(b"mp3 bytes", &metadata).await?;
/// assert_eq!(storage.duration("narration").await?, Some(4.2));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn compute_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    /// Number of stored assets.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the backend holds no assets.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl AssetStorage for MemoryStorage {
    #[tracing::instrument(skip(self, data, metadata), fields(asset_id = %metadata.asset_id, size = data.len()))]
    async fn store(&self, data: &[u8], metadata: &AssetMetadata) -> GiottoResult<StoredAsset> {
        let hash = Self::compute_hash(data);
        let asset = StoredAsset {
            id: Uuid::new_v4(),
            asset_id: metadata.asset_id.clone(),
            content_hash: hash.clone(),
            storage_backend: "memory".to_string(),
            url: format!("memory://{}/{}", metadata.media_type, hash),
            size_bytes: data.len() as i64,
            media_type: metadata.media_type,
            mime_type: metadata.mime_type.clone(),
            duration_seconds: metadata.duration_seconds,
        };

        tracing::debug!(hash = %hash, "Stored asset in memory");

        self.entries.write().await.insert(
            metadata.asset_id.clone(),
            MemoryEntry {
                asset: asset.clone(),
                data: data.to_vec(),
            },
        );

        Ok(asset)
    }

    #[tracing::instrument(skip(self))]
    async fn retrieve(&self, asset_id: &str) -> GiottoResult<Vec<u8>> {
        let entries = self.entries.read().await;
        let entry = entries
            .get(asset_id)
            .ok_or_else(|| StorageError::new(StorageErrorKind::NotFound(asset_id.to_string())))?;
        Ok(entry.data.clone())
    }

    async fn url(&self, asset_id: &str) -> GiottoResult<String> {
        let entries = self.entries.read().await;
        entries
            .get(asset_id)
            .map(|entry| entry.asset.url.clone())
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::NotFound(asset_id.to_string())).into()
            })
    }

    async fn duration(&self, asset_id: &str) -> GiottoResult<Option<f64>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(asset_id)
            .and_then(|entry| entry.asset.duration_seconds))
    }

    async fn exists(&self, asset_id: &str) -> GiottoResult<bool> {
        Ok(self.entries.read().await.contains_key(asset_id))
    }
}
