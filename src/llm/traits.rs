//! LlmClient trait definition
//!
//! Defines the abstract interface to the hosted language model.
//! This trait follows the same pattern as `GraphStore`:
//! async trait + Send + Sync for `Arc<dyn LlmClient>` usage.

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// Incremental model output, one text chunk per item
pub type TextStream = BoxStream<'static, Result<String>>;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Abstract interface to a hosted chat-completion model.
///
/// # Implementations
///
/// - [`HttpLlmClient`](super::HttpLlmClient): any OpenAI-compatible
///   `/chat/completions` endpoint (Hugging Face inference endpoints, vLLM, Ollama, OpenAI)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a complete answer in one response.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Generate an answer as a stream of text chunks.
    ///
    /// Errors before the first chunk (connection refused, non-2xx status) are
    /// returned directly; errors after that arrive as an `Err` item.
    async fn stream(&self, messages: Vec<ChatMessage>) -> Result<TextStream>;

    /// The model identifier sent with each request.
    fn model_name(&self) -> &str;
}
