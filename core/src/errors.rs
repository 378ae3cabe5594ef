use thiserror::Error;

/// Errors raised while talking to the completion service
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Completion request timed out: {0}")]
    Timeout(String),

    #[error("Completion service unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP Error: {status_code} - {message}")]
    HttpError { status_code: u16, message: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    /// Classify a transport error coming out of reqwest.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Timeout(err.to_string())
        } else if err.is_decode() {
            CompletionError::MalformedResponse(err.to_string())
        } else {
            CompletionError::Unavailable(err.to_string())
        }
    }
}

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;
