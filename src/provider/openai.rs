//! OpenAI Chat Completions adapter.
//!
//! Only the fields this crate consumes are modelled. Everything else in a response
//! (usage, finish reasons, extra choices) is ignored during deserialization.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::{StreamExt, future};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::core::{
    ChatProvider, ChunkStream, Completion, CompletionChunk, CompletionRequest, HttpClient,
    LlmError, Message,
};
use crate::provider::constants::openai;

pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    http: HttpClient,
}

impl OpenAiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, LlmError> {
        let http = HttpClient::new(config.http_config())?;

        Ok(Self {
            api_key: config.api_key().to_string(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, openai::CHAT_COMPLETIONS_ENDPOINT)
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        )]
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError> {
        let body = ChatCompletionRequest::from_request(request, false);
        debug!(model = %body.model, messages = body.messages.len(), "Sending chat completion");

        let res: ChatCompletionResponse = self
            .http
            .post_json(&self.url(), &self.headers(), &body)
            .await?;
        res.try_into()
    }

    async fn stream(&self, request: &CompletionRequest) -> Result<ChunkStream, LlmError> {
        let body = ChatCompletionRequest::from_request(request, true);
        debug!(
            model = %body.model,
            messages = body.messages.len(),
            "Sending streamed chat completion"
        );

        let res = self
            .http
            .post_stream(&self.url(), &self.headers(), &body)
            .await?;

        let chunks = res
            .bytes_stream()
            .eventsource()
            .take_while(|event| {
                future::ready(!matches!(event, Ok(event) if event.data == openai::STREAM_DONE))
            })
            .map(|event| match event {
                Ok(event) => parse_chunk(&event.data),
                Err(e) => Err(LlmError::Stream {
                    message: "Failed to read event stream".to_string(),
                    source: e.to_string().into(),
                }),
            });

        Ok(Box::pin(chunks))
    }
}

fn parse_chunk(data: &str) -> Result<CompletionChunk, LlmError> {
    serde_json::from_str::<ChatCompletionChunk>(data)
        .map_err(|e| LlmError::Parse {
            message: format!("Failed to parse stream chunk: {data}"),
            source: Box::new(e),
        })?
        .try_into()
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_request(request: &'a CompletionRequest, stream: bool) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            temperature: request.generation.temperature,
            max_tokens: request.generation.max_tokens,
            stream: stream.then_some(true),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,

    /// Set when the provider reports a failure inside a 200 body.
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,

    /// In-band stream failure, e.g. `data: {"error":{"message":...}}`.
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ApiErrorBody {
    fn into_error(self) -> LlmError {
        LlmError::Api {
            message: self.message,
            status_code: None,
        }
    }
}

impl TryFrom<ChatCompletionResponse> for Completion {
    type Error = LlmError;

    fn try_from(res: ChatCompletionResponse) -> Result<Self, Self::Error> {
        if let Some(error) = res.error {
            return Err(error.into_error());
        }

        Ok(Completion {
            primary_text: res
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
        })
    }
}

impl TryFrom<ChatCompletionChunk> for CompletionChunk {
    type Error = LlmError;

    fn try_from(chunk: ChatCompletionChunk) -> Result<Self, Self::Error> {
        if let Some(error) = chunk.error {
            return Err(error.into_error());
        }

        Ok(CompletionChunk {
            fragment: chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta.content),
        })
    }
}
