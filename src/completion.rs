//! The public completion client.

use futures::{StreamExt, stream};
use tracing::error;

use crate::config::ClientConfig;
use crate::core::{
    ChatProvider, ChunkStream, CompletionChunk, CompletionRequest, FragmentStream,
    GenerationConfig, LlmError, Message,
};
use crate::provider::OpenAiClient;

/// Sends conversations to a chat completion backend, either in one shot or streamed.
///
/// Every failure coming back from the provider is logged once at `ERROR` and returned to
/// the caller unchanged. Nothing is retried.
pub struct ChatCompletion<P: ChatProvider = OpenAiClient> {
    provider: P,
    model: String,
}

impl ChatCompletion<OpenAiClient> {
    pub fn new(config: ClientConfig) -> Result<Self, LlmError> {
        let provider = OpenAiClient::new(&config)?;
        Ok(Self::with_provider(provider, config.model()))
    }

    /// Resolve [`ClientConfig`] from the environment and build a client from it.
    ///
    /// Fails with [`LlmError::Configuration`] when `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<P: ChatProvider> ChatCompletion<P> {
    pub fn with_provider(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request a completion and return the text of the primary choice.
    ///
    /// A response without choices, or whose primary choice has no content, is reported
    /// as [`LlmError::EmptyResponse`].
    #[tracing::instrument(
        name = "generate_completion",
        skip(self, messages),
        fields(model = %self.model, messages = messages.len())
    )]
    pub async fn generate_completion(
        &self,
        messages: &[Message],
        generation: GenerationConfig,
    ) -> Result<String, LlmError> {
        let request = self.request(messages, generation);

        let result = match self.provider.complete(&request).await {
            Ok(completion) => completion.primary_text.ok_or_else(|| {
                LlmError::EmptyResponse("Response contained no message content".to_string())
            }),
            Err(e) => Err(e),
        };

        result.inspect_err(log_provider_error)
    }

    /// Request a streamed completion.
    ///
    /// The returned stream yields each non-empty delta in the order the provider emits
    /// them. Units without content are skipped. If the provider fails mid-stream the
    /// error is yielded once and the stream ends; fragments already received stay with
    /// the caller. A stream can be consumed only once.
    #[tracing::instrument(
        name = "stream_completion",
        skip(self, messages),
        fields(model = %self.model, messages = messages.len())
    )]
    pub async fn stream_completion(
        &self,
        messages: &[Message],
        generation: GenerationConfig,
    ) -> Result<FragmentStream, LlmError> {
        let request = self.request(messages, generation);

        let chunks = self
            .provider
            .stream(&request)
            .await
            .inspect_err(log_provider_error)?;

        Ok(into_fragments(chunks))
    }

    fn request(&self, messages: &[Message], generation: GenerationConfig) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            generation,
        }
    }
}

fn into_fragments(chunks: ChunkStream) -> FragmentStream {
    // `None` state marks a stream that already failed.
    Box::pin(stream::unfold(Some(chunks), |state| async move {
        let Some(mut chunks) = state else {
            return None;
        };
        loop {
            match chunks.next().await {
                None => return None,
                Some(Ok(CompletionChunk {
                    fragment: Some(text),
                })) => return Some((Ok(text), Some(chunks))),
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    log_provider_error(&e);
                    return Some((Err(e), None));
                }
            }
        }
    }))
}

fn log_provider_error(err: &LlmError) {
    error!(
        kind = ?err.kind(),
        status = ?err.status_code(),
        "Chat completion API error: {err}"
    );
}
