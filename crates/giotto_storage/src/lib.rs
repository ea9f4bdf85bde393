//! Content-addressable asset storage for the Giotto asset pipeline.
//!
//! This crate provides pluggable storage backends for generated assets
//! (images, narration audio, assembled cutscene definitions). Executors
//! store artifacts here and downstream consumers resolve them by the
//! producing action's identifier.
//!
//! # Features
//!
//! - **Content-addressable storage**: files stored by SHA-256 hash for
//!   automatic deduplication
//! - **Pluggable backends**: trait-based abstraction with in-memory and
//!   filesystem implementations
//! - **Atomic operations**: the filesystem backend writes via temp file +
//!   rename
//!
//! # Example
//!
//! ```rust
//! use giotto_storage::{AssetMetadata, AssetStorage, MediaType, MemoryStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = MemoryStorage::new();
//! let metadata = AssetMetadata {
//!     asset_id: "hero_bg".to_string(),
//!     media_type: MediaType::Image,
//!     mime_type: "image/png".to_string(),
//!     duration_seconds: None,
//! };
//!
//! let data = vec![0u8; 1024];
//! let stored = storage.store(&data, &metadata).await?;
//!
//! assert!(storage.exists("hero_bg").await?);
//! assert_eq!(storage.url("hero_bg").await?, stored.url);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod media_type;
mod memory;
mod storage;

pub use filesystem::FileSystemStorage;
pub use giotto_error::{StorageError, StorageErrorKind};
pub use media_type::MediaType;
pub use memory::MemoryStorage;
pub use storage::{AssetMetadata, AssetStorage, StoredAsset};
