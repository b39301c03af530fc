//! Hosted language-model access
//!
//! Architecture follows the project pattern (trait + impl + mock):
//! - `LlmClient` trait: complete / stream interface
//! - `HttpLlmClient`: any OpenAI-compatible chat-completions endpoint
//! - `MockLlmClient`: scripted replies for tests

pub mod provider;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use provider::HttpLlmClient;
pub use traits::{ChatMessage, LlmClient, Role, TextStream};
