use futures::stream::BoxStream;
use serde::Serialize;

use super::error::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: ChatRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Configuration for text generation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    /// Sampling temperature. Passed through without range checks.
    pub temperature: f32,

    /// Maximum number of tokens to generate. `None` leaves it to the provider.
    pub max_tokens: Option<u32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A single request handed to a [`ChatProvider`](super::traits::ChatProvider).
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub generation: GenerationConfig,
}

/// Provider-neutral result of a one-shot completion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Completion {
    /// Text of the primary choice, if the provider returned any.
    pub primary_text: Option<String>,
}

/// Provider-neutral unit of a streamed completion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionChunk {
    pub fragment: Option<String>,
}

/// Raw units as the provider emits them.
pub type ChunkStream = BoxStream<'static, Result<CompletionChunk, LlmError>>;

/// Text fragments as handed to callers.
pub type FragmentStream = BoxStream<'static, Result<String, LlmError>>;
