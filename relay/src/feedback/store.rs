use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Unvalidated feedback payload, stored exactly as submitted
pub type FeedbackRecord = Map<String, Value>;

/// Error type for feedback store operations
#[derive(Debug, Error)]
pub enum FeedbackStoreError {
    /// Error occurred during a store operation
    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Trait defining the interface for feedback stores
#[async_trait]
pub trait FeedbackStore: Send + Sync + std::fmt::Debug {
    /// Append a record. Once this returns, the record is visible to `list_all`.
    async fn append(&self, record: FeedbackRecord) -> Result<(), FeedbackStoreError>;

    /// Snapshot of every record, oldest first
    async fn list_all(&self) -> Result<Vec<FeedbackRecord>, FeedbackStoreError>;

    /// Number of stored records
    async fn len(&self) -> Result<usize, FeedbackStoreError>;
}

/// Type alias for Arc-wrapped FeedbackStore trait objects
pub type FeedbackStoreRef = Arc<dyn FeedbackStore>;
