use async_trait::async_trait;

use super::{
    error::LlmError,
    types::{ChunkStream, Completion, CompletionRequest},
};

/// A backend able to answer chat completion requests.
///
/// Implementations translate [`CompletionRequest`] into their own wire format and map
/// the reply onto [`Completion`] / [`CompletionChunk`](super::types::CompletionChunk),
/// so nothing above this trait depends on a provider's response shape.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, LlmError>;

    /// Start a streamed completion. Errors raised before the first unit is available
    /// are returned here; later ones arrive as items of the stream.
    async fn stream(&self, request: &CompletionRequest) -> Result<ChunkStream, LlmError>;
}
