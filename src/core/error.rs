use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Broad classification of an [`LlmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The client could not be constructed. Never retried.
    Configuration,
    /// Anything the remote call surfaced, before or during a stream.
    Provider,
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {message}: {source}")]
    Network {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Parse error: {message}: {source}")]
    Parse {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Stream error: {message}: {source}")]
    Stream {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::Configuration(_) => ErrorKind::Configuration,
            LlmError::Network { .. }
            | LlmError::Api { .. }
            | LlmError::Parse { .. }
            | LlmError::Stream { .. }
            | LlmError::EmptyResponse(_) => ErrorKind::Provider,
        }
    }

    /// HTTP status reported by the provider, if the failure carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }
}
