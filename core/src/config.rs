use crate::errors::{CompletionError, CompletionResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL_NAME: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the completion service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    /// Base URL of an OpenAI-compatible endpoint, without the `/v1/...` path
    pub base_url: Option<String>,
    /// Per-request timeout for completion calls
    pub timeout_secs: Option<u64>,
}

impl ModelConfig {
    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    pub fn model_name_or_default(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }

    pub fn base_url_or_default(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout_secs_or_default(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> CompletionResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        CompletionError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> CompletionResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
