//! LLM integration for the lead engine.
//!
//! A chat-completions abstraction ([`ChatBackend`]) with an
//! OpenAI-compatible implementation (Bearer auth, retries with exponential
//! backoff), plus the aspect-based sentiment provider built on top of it.

pub mod chat;
pub mod openai;
pub mod sentiment;

pub use chat::{
    ChatBackend, ChatMessage, ChatOptions, ChatRole, ToolCallFunction, ToolCallRequest,
    ToolFunction, ToolSpec,
};
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use sentiment::{AspectSentiment, LlmSentimentProvider, LlmSentimentResult};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
