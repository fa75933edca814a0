//! Thin HTTP transport shared by providers.
//!
//! Requests are sent exactly once. Non-2xx responses become [`LlmError::Api`] and are
//! handed back to the caller untouched; whether to try again is the caller's decision.

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::error::LlmError;

#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Total time budget per request. `None` keeps reqwest's default.
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl HttpClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self, LlmError> {
        let default_ua = format!("chat-completion/{}", env!("CARGO_PKG_VERSION"));
        let ua = config.user_agent.as_deref().unwrap_or(&default_ua);

        let mut builder = reqwest::Client::builder().user_agent(ua);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            LlmError::Configuration(format!("Failed to build reqwest client: {e}"))
        })?;

        Ok(Self { client })
    }

    /// POST a JSON body and deserialize the JSON reply.
    #[tracing::instrument(name = "http_post_json", skip(self, headers, body), fields(url = %url))]
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<Res, LlmError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let res = self.send(url, headers, body).await?;

        let response_text = res.text().await.map_err(|e| LlmError::Network {
            message: "Failed to read response body".to_string(),
            source: Box::new(e),
        })?;

        serde_json::from_str(&response_text).map_err(|e| LlmError::Parse {
            message: "Failed to parse API response".to_string(),
            source: Box::new(e),
        })
    }

    /// POST a JSON body and hand back the successful response without reading it,
    /// for callers that consume the body incrementally.
    #[tracing::instrument(name = "http_post_stream", skip(self, headers, body), fields(url = %url))]
    pub async fn post_stream<Req>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<reqwest::Response, LlmError>
    where
        Req: Serialize,
    {
        self.send(url, headers, body).await
    }

    async fn send<Req>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<reqwest::Response, LlmError>
    where
        Req: Serialize,
    {
        let mut req_builder = self.client.post(url).json(body);
        for (name, value) in headers {
            req_builder = req_builder.header(name, value);
        }

        let res = req_builder.send().await.map_err(|e| LlmError::Network {
            message: "Failed to complete request".to_string(),
            source: Box::new(e),
        })?;

        let status = res.status();
        if status.is_success() {
            debug!(status = %status, "HTTP request successful");
            return Ok(res);
        }

        let error_text = res
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(LlmError::Api {
            message: api_error_message(&error_text),
            status_code: Some(status.as_u16()),
        })
    }
}

/// Pull `error.message` out of an OpenAI-style error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
