pub(crate) mod constants;
pub mod openai;

pub use openai::OpenAiClient;
