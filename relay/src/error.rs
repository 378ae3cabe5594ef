use symptom_core::CompletionError;
use thiserror::Error;

/// Failures of the `/check` flow that reach the caller
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("conversation contains no user message")]
    NoUserInput,

    #[error("failed to get reply from model: {0}")]
    ModelCall(#[from] CompletionError),
}

pub type TriageResult<T> = Result<T, TriageError>;
