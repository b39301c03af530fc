//! Scripted model client for tests
//!
//! Replays a fixed list of chunks for every request and records the
//! messages it was sent, so tests can assert on prompt formatting.

use super::traits::{ChatMessage, LlmClient, TextStream};
use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Mutex;

/// Scripted mock model.
pub struct MockLlmClient {
    chunks: Vec<String>,
    fail: Option<String>,
    interrupt: Option<String>,
    /// Every message list received, in call order
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlmClient {
    /// A model that answers every request with `chunks`
    pub fn replying(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            fail: None,
            interrupt: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A model whose every request fails with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            chunks: Vec::new(),
            fail: Some(message.to_string()),
            interrupt: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A model whose stream yields `chunks` then breaks off with `message`
    pub fn interrupted(chunks: &[&str], message: &str) -> Self {
        Self {
            interrupt: Some(message.to_string()),
            ..Self::replying(chunks)
        }
    }

    /// The messages of the most recent request
    pub fn last_request(&self) -> Vec<ChatMessage> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, messages: Vec<ChatMessage>) -> Result<()> {
        self.requests.lock().unwrap().push(messages);
        match &self.fail {
            Some(message) => anyhow::bail!("{}", message),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        self.record(messages)?;
        Ok(self.chunks.concat())
    }

    async fn stream(&self, messages: Vec<ChatMessage>) -> Result<TextStream> {
        self.record(messages)?;
        let mut items: Vec<Result<String>> = self.chunks.iter().cloned().map(Ok).collect();
        if let Some(message) = &self.interrupt {
            items.push(Err(anyhow::anyhow!("{}", message)));
        }
        Ok(futures::stream::iter(items).boxed())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
