// Shared completion-service plumbing for the symptom relay:
// - Chat completion client trait and the OpenAI-compatible implementation
// - Chat message types
// - Model configuration loading
// - Completion error type

pub mod client;
pub use client::*;

pub mod types;
pub use types::*;

pub mod config;
pub use config::*;

pub mod errors;
pub use errors::*;
