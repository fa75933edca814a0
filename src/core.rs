pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, LlmError};
pub use http::{HttpClient, HttpClientConfig};
pub use traits::ChatProvider;
pub use types::{
    ChatRole, ChunkStream, Completion, CompletionChunk, CompletionRequest, FragmentStream,
    GenerationConfig, Message,
};
