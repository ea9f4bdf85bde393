//! Storage trait definition.

use crate::MediaType;
use giotto_error::{GiottoResult, StorageError, StorageErrorKind};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Metadata about an asset being stored.
#[derive(Debug, Clone)]
pub struct AssetMetadata {
    /// Identifier of the producing action; the key downstream consumers
    /// resolve the asset by
    pub asset_id: String,
    /// Type of asset (image, audio, definition)
    pub media_type: MediaType,
    /// MIME type (e.g., "image/png", "audio/mpeg", "application/json")
    pub mime_type: String,
    /// Audio duration in seconds, when known
    pub duration_seconds: Option<f64>,
}

/// Reference to a stored asset.
///
/// Contains everything needed to retrieve the asset from a backend plus the
/// metadata the execution layer reports to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    /// Unique identifier for this stored record
    pub id: Uuid,
    /// Identifier of the producing action
    pub asset_id: String,
    /// SHA-256 hash of the content (for deduplication)
    pub content_hash: String,
    /// Storage backend name (e.g., "memory", "filesystem")
    pub storage_backend: String,
    /// Resolvable location of the asset
    pub url: String,
    /// Size of the asset in bytes
    pub size_bytes: i64,
    /// Type of asset
    pub media_type: MediaType,
    /// MIME type
    pub mime_type: String,
    /// Audio duration in seconds, when the asset carries sound
    pub duration_seconds: Option<f64>,
}

/// Trait for pluggable asset storage backends.
///
/// Implementations handle the actual storage and retrieval of asset data,
/// keyed by the producing action's identifier.
#[async_trait::async_trait]
pub trait AssetStorage: Send + Sync {
    /// Store asset bytes and return a reference.
    ///
    /// The implementation should:
    /// - Compute a content hash for deduplication
    /// - Store the binary data in its backend
    /// - Index the asset under `metadata.asset_id`
    async fn store(&self, data: &[u8], metadata: &AssetMetadata) -> GiottoResult<StoredAsset>;

    /// Store a JSON value as an asset.
    ///
    /// The default implementation serializes the value and delegates to
    /// [`AssetStorage::store`].
    async fn store_json(
        &self,
        value: &JsonValue,
        metadata: &AssetMetadata,
    ) -> GiottoResult<StoredAsset> {
        let data = serde_json::to_vec_pretty(value).map_err(|e| {
            StorageError::new(StorageErrorKind::Serialization(format!(
                "{}: {}",
                metadata.asset_id, e
            )))
        })?;
        self.store(&data, metadata).await
    }

    /// Retrieve asset bytes by the producing action's identifier.
    async fn retrieve(&self, asset_id: &str) -> GiottoResult<Vec<u8>>;

    /// Resolvable URL for an asset.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] when no asset is stored under
    /// the identifier.
    async fn url(&self, asset_id: &str) -> GiottoResult<String>;

    /// Audio duration of an asset in seconds, when the asset carries sound.
    async fn duration(&self, asset_id: &str) -> GiottoResult<Option<f64>>;

    /// Check whether an asset is stored under the identifier.
    async fn exists(&self, asset_id: &str) -> GiottoResult<bool>;
}
