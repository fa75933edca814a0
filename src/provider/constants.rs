pub mod openai {
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    pub const API_BASE: &str = "https://api.openai.com/v1";
    pub const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";
    pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
    pub const MODEL_ENV_VAR: &str = "OPENAI_MODEL";
    /// Sentinel `data` payload closing a server-sent event stream.
    pub const STREAM_DONE: &str = "[DONE]";
}
