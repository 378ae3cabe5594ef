//! Symptom-triage chat relay.
//!
//! Forwards a symptom conversation to a chat completion service and augments
//! the reply with a severity label, keyword-matched conditions and a lexical
//! confidence score. Also collects free-form feedback.

pub mod config;
pub mod confidence;
pub mod coordinator;
pub mod error;
pub mod feedback;
pub mod http_server;
pub mod keywords;
pub mod matcher;
pub mod severity;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use coordinator::{StructuredResponse, TriageCoordinator};
pub use error::{TriageError, TriageResult};
