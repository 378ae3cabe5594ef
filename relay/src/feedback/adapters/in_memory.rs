use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::feedback::store::{FeedbackRecord, FeedbackStore, FeedbackStoreError};

/// In-memory implementation of FeedbackStore. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryFeedbackStore {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl InMemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn append(&self, record: FeedbackRecord) -> Result<(), FeedbackStoreError> {
        let mut records = self.records.write().map_err(|e| {
            FeedbackStoreError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        records.push(record);
        debug!(total = records.len(), "Stored feedback record");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<FeedbackRecord>, FeedbackStoreError> {
        let records = self.records.read().map_err(|e| {
            FeedbackStoreError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.clone())
    }

    async fn len(&self) -> Result<usize, FeedbackStoreError> {
        let records = self.records.read().map_err(|e| {
            FeedbackStoreError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn record(value: serde_json::Value) -> FeedbackRecord {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_append_then_list_returns_in_order() {
        let store = InMemoryFeedbackStore::new();
        store.append(record(json!({"rating": 5}))).await.unwrap();
        store.append(record(json!({"rating": 3}))).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![record(json!({"rating": 5})), record(json!({"rating": 3}))]);
    }

    #[tokio::test]
    async fn test_latest_append_is_last() {
        let store = InMemoryFeedbackStore::new();
        store.append(record(json!({"message": "first"}))).await.unwrap();

        let submitted = record(json!({"message": "take rest", "wasHelpful": true, "tags": ["a", 1]}));
        store.append(submitted.clone()).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.last(), Some(&submitted));
        assert_eq!(all[0], record(json!({"message": "first"})));
    }

    #[tokio::test]
    async fn test_duplicates_and_empty_records_are_kept() {
        let store = InMemoryFeedbackStore::new();
        store.append(FeedbackRecord::new()).await.unwrap();
        store.append(record(json!({"rating": 1}))).await.unwrap();
        store.append(record(json!({"rating": 1}))).await.unwrap();

        assert_eq!(store.len().await.unwrap(), 3);
        assert!(store.list_all().await.unwrap()[0].is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_are_not_lost() {
        let store = Arc::new(InMemoryFeedbackStore::new());

        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(record(json!({ "id": i }))).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 64);
        let mut ids: Vec<i64> = all.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..64).collect::<Vec<i64>>());
    }
}
