use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::errors::{CompletionError, CompletionResult};
use crate::types::*;

/// Common trait for chat completion backends
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one chat completion over `messages` and return the generated text
    async fn complete(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> CompletionResult<String>;

    /// Get the model name being used
    fn model_name(&self) -> String;
}

/// Type alias for Arc-wrapped CompletionClient trait objects
pub type CompletionClientRef = Arc<dyn CompletionClient>;

/// Client for OpenAI-compatible chat completion endpoints
#[derive(Debug, Clone)]
pub struct OpenAIClient {
    model_name: String,
    base_url: String,
    http_client: Client,
}

impl OpenAIClient {
    /// Create a new client. The API key is required and must not be empty.
    pub fn new(config: &ModelConfig) -> CompletionResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                CompletionError::ConfigError(
                    "API key is required to initialize the completion client".to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| CompletionError::ConfigError(format!("Invalid API key format: {}", e)))?,
        );

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs_or_default()))
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                CompletionError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            model_name: config.model_name_or_default().to_string(),
            base_url: config.base_url_or_default().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Build the chat completions URL
    fn api_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Pull the first choice's text out of a raw response body
    fn extract_text(response_text: &str) -> CompletionResult<String> {
        let response: ChatCompletionResponse = serde_json::from_str(response_text)
            .map_err(|e| CompletionError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &response.usage {
            debug!(
                prompt = usage.prompt_tokens,
                completion = usage.completion_tokens,
                total = usage.total_tokens,
                "Completion token usage"
            );
        }

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            CompletionError::MalformedResponse("No choices in response".to_string())
        })?;

        if let Some(reason) = choice.finish_reason.as_deref() {
            if reason != "stop" {
                warn!(finish_reason = reason, "Completion did not finish normally");
            }
        }

        choice.message.content.ok_or_else(|| {
            CompletionError::MalformedResponse("No content in first choice".to_string())
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    fn model_name(&self) -> String {
        self.model_name.clone()
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: CompletionOptions,
    ) -> CompletionResult<String> {
        debug!(
            model = %self.model_name,
            messages = messages.len(),
            temperature = options.temperature,
            max_tokens = options.max_tokens,
            "Requesting chat completion"
        );

        let request = ChatCompletionRequest {
            model: &self.model_name,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .http_client
            .post(self.api_url())
            .json(&request)
            .send()
            .await
            .map_err(CompletionError::from_transport)?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(CompletionError::from_transport)?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ChatErrorResponse>(&response_text) {
                Ok(error_response) => match error_response.error.error_type {
                    Some(kind) => format!("{} (type: {})", error_response.error.message, kind),
                    None => error_response.error.message,
                },
                Err(_) => response_text,
            };
            return Err(CompletionError::HttpError {
                status_code: status.as_u16(),
                message,
            });
        }

        Self::extract_text(&response_text)
    }
}
