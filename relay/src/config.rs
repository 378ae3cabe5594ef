//! Relay configuration, resolved once at startup.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML config file,
//! environment (`OPENAI_API_KEY`), then CLI flags applied by the daemon.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use symptom_core::{get_default_config_file, CompletionError, ModelConfig};
use thiserror::Error;

use crate::keywords::{KeywordLibrary, KeywordLibraryError};

pub const APP_NAME: &str = "symptom-relay";
pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Model(#[from] CompletionError),
    #[error(transparent)]
    Keywords(#[from] KeywordLibraryError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub http_addr: SocketAddr,
    /// The single origin allowed by CORS
    pub allowed_origin: String,
    /// Include the error chain as `trace` in `/check` error bodies.
    /// Debug deployments only.
    pub expose_trace: bool,
    /// Optional TOML keyword table replacing the built-in one
    pub keyword_file: Option<PathBuf>,
    /// Completion service settings
    pub model: ModelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            http_addr: DEFAULT_HTTP_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8000))),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            expose_trace: false,
            keyword_file: None,
            model: ModelConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `~/.config/symptom-relay/config.toml`
    pub fn load_from_default() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        Self::load_from_file(&path)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(get_default_config_file(APP_NAME)?)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_api_key(std::env::var(API_KEY_ENV).ok());
    }

    /// Replace the model API key when `api_key` is present and non-empty
    pub fn apply_api_key(&mut self, api_key: Option<String>) {
        let overrides = ModelConfig {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            ..Default::default()
        };
        self.model = self.model.merge(&overrides);
    }

    /// Build the keyword library named by `keyword_file`, or the built-in one
    pub fn keyword_library(&self) -> Result<KeywordLibrary, ConfigError> {
        match &self.keyword_file {
            Some(path) => Ok(KeywordLibrary::load_from_file(path)?),
            None => Ok(KeywordLibrary::default()),
        }
    }
}
