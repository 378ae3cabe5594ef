//! Feedback storage for the relay
//!
//! Feedback records are arbitrary JSON objects submitted by clients. They are
//! appended to a store behind the `FeedbackStore` trait and listed back in
//! insertion order. The only shipped backend keeps them in process memory.

pub mod adapters;
pub mod store;

pub use adapters::InMemoryFeedbackStore;
pub use store::{FeedbackRecord, FeedbackStore, FeedbackStoreError, FeedbackStoreRef};
