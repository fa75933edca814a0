//! Client configuration and its resolution from the environment.

use std::fmt;

use crate::core::{HttpClientConfig, LlmError};
use crate::provider::constants::openai;

/// Everything a client needs, resolved once and never mutated afterwards.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    model: String,
    base_url: String,
    http_config: HttpClientConfig,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::Configuration("API key must not be empty".to_string()));
        }

        Ok(Self {
            api_key,
            model: model.into(),
            base_url: openai::API_BASE.to_string(),
            http_config: HttpClientConfig::default(),
        })
    }

    /// Resolve from the process environment, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self, LlmError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve through an arbitrary variable lookup.
    ///
    /// `OPENAI_API_KEY` is required and must be non-empty. `OPENAI_MODEL` falls back to
    /// `gpt-4o-mini` when unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(openai::API_KEY_ENV_VAR)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                LlmError::Configuration(format!(
                    "{} not found in environment variables",
                    openai::API_KEY_ENV_VAR
                ))
            })?;

        let model = lookup(openai::MODEL_ENV_VAR)
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());

        Self::new(api_key, model)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http_config(&self) -> &HttpClientConfig {
        &self.http_config
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("http_config", &self.http_config)
            .finish()
    }
}
