use giotto_error::GiottoErrorKind;
use giotto_storage::{
    AssetMetadata, AssetStorage, FileSystemStorage, MediaType, MemoryStorage,
};
use serde_json::json;

fn image_metadata(asset_id: &str) -> AssetMetadata {
    AssetMetadata {
        asset_id: asset_id.to_string(),
        media_type: MediaType::Image,
        mime_type: "image/png".to_string(),
        duration_seconds: None,
    }
}

#[tokio::test]
async fn memory_storage_round_trips() {
    let storage = MemoryStorage::new();
    let stored = storage.store(b"png bytes", &image_metadata("bg")).await.unwrap();

    assert_eq!(stored.asset_id, "bg");
    assert_eq!(stored.storage_backend, "memory");
    assert!(stored.url.starts_with("memory://image/"));

    assert!(storage.exists("bg").await.unwrap());
    assert_eq!(storage.retrieve("bg").await.unwrap(), b"png bytes");
    assert_eq!(storage.url("bg").await.unwrap(), stored.url);
}

#[tokio::test]
async fn memory_storage_reports_missing_assets() {
    let storage = MemoryStorage::new();
    assert!(!storage.exists("ghost").await.unwrap());

    let err = storage.url("ghost").await.unwrap_err();
    assert!(matches!(err.kind(), GiottoErrorKind::Storage(_)));
}

#[tokio::test]
async fn duration_comes_from_metadata() {
    let storage = MemoryStorage::new();
    storage
        .store(
            b"mp3",
            &AssetMetadata {
                asset_id: "line".to_string(),
                media_type: MediaType::Audio,
                mime_type: "audio/mpeg".to_string(),
                duration_seconds: Some(7.5),
            },
        )
        .await
        .unwrap();

    assert_eq!(storage.duration("line").await.unwrap(), Some(7.5));
    assert_eq!(storage.duration("absent").await.unwrap(), None);
}

#[tokio::test]
async fn store_json_serializes_and_stores() {
    let storage = MemoryStorage::new();
    let definition = json!({"shots": [{"duration": 5.0}]});
    let stored = storage
        .store_json(
            &definition,
            &AssetMetadata {
                asset_id: "cs".to_string(),
                media_type: MediaType::Definition,
                mime_type: "application/json".to_string(),
                duration_seconds: Some(5.0),
            },
        )
        .await
        .unwrap();

    assert_eq!(stored.media_type, MediaType::Definition);
    let bytes = storage.retrieve("cs").await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed, definition);
}

#[tokio::test]
async fn filesystem_storage_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileSystemStorage::new(dir.path()).unwrap();

    let stored = storage.store(b"png bytes", &image_metadata("bg")).await.unwrap();
    assert_eq!(stored.storage_backend, "filesystem");
    assert!(stored.url.starts_with("file://"));

    assert!(storage.exists("bg").await.unwrap());
    assert_eq!(storage.retrieve("bg").await.unwrap(), b"png bytes");
}

#[tokio::test]
async fn filesystem_storage_deduplicates_identical_content() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileSystemStorage::new(dir.path()).unwrap();

    let first = storage.store(b"same bytes", &image_metadata("a")).await.unwrap();
    let second = storage.store(b"same bytes", &image_metadata("b")).await.unwrap();

    assert_eq!(first.content_hash, second.content_hash);
    // Both ids resolve, backed by one content file.
    assert!(storage.exists("a").await.unwrap());
    assert!(storage.exists("b").await.unwrap());
}

#[tokio::test]
async fn storing_under_an_existing_id_replaces_the_reference() {
    let storage = MemoryStorage::new();
    storage.store(b"v1", &image_metadata("bg")).await.unwrap();
    storage.store(b"v2", &image_metadata("bg")).await.unwrap();

    assert_eq!(storage.len().await, 1);
    assert_eq!(storage.retrieve("bg").await.unwrap(), b"v2");
}
