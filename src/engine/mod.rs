//! Generation engine facade
//!
//! Formats the fixed instructional prompts and relays the model's output.
//! No retry or cancellation wraps the upstream call: a failure surfaces
//! to the caller as-is.

pub mod prompt;

use crate::llm::{ChatMessage, LlmClient, TextStream};
use anyhow::Result;
use std::sync::Arc;

/// Facade over the hosted model
#[derive(Clone)]
pub struct SolutionEngine {
    llm: Arc<dyn LlmClient>,
}

impl SolutionEngine {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Step-by-step solution in one response
    pub async fn solve(&self, problem: &str) -> Result<String> {
        tracing::debug!("Solving with {}", self.llm.model_name());
        self.llm
            .complete(vec![ChatMessage::user(prompt::solve_prompt(problem))])
            .await
    }

    /// Step-by-step solution as it is generated
    pub async fn solve_stream(&self, problem: &str) -> Result<TextStream> {
        self.llm
            .stream(vec![ChatMessage::user(prompt::solve_prompt(problem))])
            .await
    }

    /// Answer a chat turn with the prior conversation embedded in the prompt
    pub async fn chat_stream(&self, history: &[ChatMessage], question: &str) -> Result<TextStream> {
        self.llm
            .stream(vec![ChatMessage::user(prompt::chat_prompt(
                history, question,
            ))])
            .await
    }

    /// Answer a side question using the main conversation as context
    pub async fn follow_up_stream(
        &self,
        context: &[ChatMessage],
        question: &str,
    ) -> Result<TextStream> {
        self.llm
            .stream(vec![ChatMessage::user(prompt::follow_up_prompt(
                context, question,
            ))])
            .await
    }

    /// Ask the model to restate a worked answer as solution-record JSON
    pub async fn structure(&self, problem: &str, answer: &str) -> Result<String> {
        self.llm
            .complete(vec![ChatMessage::user(prompt::structure_prompt(
                problem, answer,
            ))])
            .await
    }
}
