//! Repository Integration Tests
//!
//! Tests for MemoryStorage against the facade contract.

#[cfg(test)]
mod tests {
    use crate::repository::{single_item, KeyValueStorage, MemoryStorage, StorageArea, StorageError};
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get_keys() {
        let storage = MemoryStorage::new();
        storage
            .set(single_item("fins_title", json!("Home")), StorageArea::Local)
            .await
            .expect("set failed");

        let found = storage
            .get(Some(&["fins_title", "missing"]), StorageArea::Local)
            .await
            .expect("get failed");
        assert_eq!(found.len(), 1);
        assert_eq!(found["fins_title"], json!("Home"));
    }

    #[tokio::test]
    async fn test_areas_are_isolated() {
        let storage = MemoryStorage::new();
        storage
            .set(single_item("k", json!(1)), StorageArea::Local)
            .await
            .unwrap();

        let sync = storage.get(None, StorageArea::Sync).await.unwrap();
        assert!(sync.is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let storage = MemoryStorage::new();
        let mut items = single_item("a", json!(1));
        items.insert("b".into(), json!(2));
        storage.set(items, StorageArea::Sync).await.unwrap();

        storage.remove(&["a", "zzz"], StorageArea::Sync).await.unwrap();
        let left = storage.get(None, StorageArea::Sync).await.unwrap();
        assert_eq!(left.keys().collect::<Vec<_>>(), vec!["b"]);

        storage.clear(StorageArea::Sync).await.unwrap();
        assert!(storage.get(None, StorageArea::Sync).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bytes_in_use_counts_keys_and_json() {
        let storage = MemoryStorage::new();
        storage
            .set(single_item("ab", json!("xyz")), StorageArea::Sync)
            .await
            .unwrap();

        // "ab" = 2, "\"xyz\"" = 5
        assert_eq!(storage.bytes_in_use(StorageArea::Sync).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_quota_rejects_oversized_write() {
        let storage = MemoryStorage::new().with_quota(StorageArea::Sync, 10);
        let err = storage
            .set(single_item("key", json!("a long value")), StorageArea::Sync)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::QuotaExceeded { quota: 10, .. }));
        assert!(storage.snapshot(StorageArea::Sync).is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_backend_fails_every_call() {
        let storage = MemoryStorage::new();
        storage.set_unavailable(true);

        assert_eq!(
            storage.bytes_in_use(StorageArea::Sync).await.unwrap_err(),
            StorageError::Unavailable(StorageArea::Sync)
        );
        assert!(storage.clear(StorageArea::Local).await.is_err());
    }
}
