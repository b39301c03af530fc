//! Scripted engine client for tests

use super::engine_client::{EngineClient, GenerationError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

enum Reply {
    Solution(Value),
    Upstream(u16, String),
    Transport(String),
}

/// Mock engine returning one fixed reply and recording every problem it saw
pub struct MockEngineClient {
    reply: Reply,
    pub calls: Mutex<Vec<String>>,
}

impl MockEngineClient {
    pub fn solving(solution: Value) -> Self {
        Self::with(Reply::Solution(solution))
    }

    pub fn upstream_error(status: u16, body: &str) -> Self {
        Self::with(Reply::Upstream(status, body.to_string()))
    }

    pub fn unreachable(message: &str) -> Self {
        Self::with(Reply::Transport(message.to_string()))
    }

    fn with(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EngineClient for MockEngineClient {
    async fn generate(&self, problem: &str) -> Result<Value, GenerationError> {
        self.calls.lock().unwrap().push(problem.to_string());
        match &self.reply {
            Reply::Solution(value) => Ok(value.clone()),
            Reply::Upstream(status, body) => Err(GenerationError::Upstream {
                status: *status,
                body: body.clone(),
            }),
            Reply::Transport(message) => Err(GenerationError::Transport {
                message: message.clone(),
            }),
        }
    }
}
