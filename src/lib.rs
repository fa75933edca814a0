//! # chat-completion
//!
//! A small wrapper around OpenAI-compatible chat completions: resolve a key and a model,
//! send a conversation, get the text back in one piece or as a stream of fragments.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chat_completion::{ChatCompletion, GenerationConfig, Message};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     chat_completion::telemetry::init_tracing();
//!
//!     let client = ChatCompletion::from_env()?;
//!     let messages = vec![Message::user("Say this is a test!")];
//!
//!     let text = client
//!         .generate_completion(&messages, GenerationConfig::default())
//!         .await?;
//!     println!("{text}");
//!
//!     let mut fragments = client
//!         .stream_completion(&messages, GenerationConfig::new().max_tokens(64))
//!         .await?;
//!     while let Some(fragment) = fragments.next().await {
//!         print!("{}", fragment?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod config;
pub mod core;
pub mod provider;
pub mod telemetry;

pub use completion::ChatCompletion;
pub use config::ClientConfig;
pub use crate::core::{
    ChatProvider, ChatRole, Completion, CompletionChunk, CompletionRequest, ErrorKind,
    FragmentStream, GenerationConfig, HttpClientConfig, LlmError, Message,
};
pub use provider::OpenAiClient;
