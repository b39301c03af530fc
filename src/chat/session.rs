//! Turn handling for the chat front end

use super::conversation::Conversation;
use super::display::{rewrite_latex, SentenceBuffer};
use crate::engine::SolutionEngine;
use crate::knowledge::{Dataset, DatasetError, SolutionRecord, StepRecord};
use crate::llm::TextStream;
use anyhow::Result;
use futures::StreamExt;
use serde::Deserialize;

/// Source label for solutions structured from a chat answer
pub const MODEL_SOURCE: &str = "model";

/// Failure to turn a chat answer into a solution record
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("Nothing to structure yet, ask a question first")]
    NothingToStructure,

    #[error("Model request failed: {0}")]
    Generation(#[source] anyhow::Error),

    #[error("Model output is not valid solution JSON: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
        output: String,
    },

    #[error("Model output contains no steps")]
    NoSteps,

    #[error(transparent)]
    Invalid(#[from] DatasetError),
}

#[derive(Debug, Deserialize)]
struct StructuredAnswer {
    steps: Vec<StepRecord>,
}

/// Chat front end over the generation engine.
///
/// Holds no conversation state: every call is handed the log it works on.
#[derive(Clone)]
pub struct ChatSession {
    engine: SolutionEngine,
}

impl ChatSession {
    pub fn new(engine: SolutionEngine) -> Self {
        Self { engine }
    }

    /// Answer `question` in the context of `conversation`.
    ///
    /// Display updates go to `on_update` as sentences complete. Text left
    /// after the last period is flushed as a final update, so that one may
    /// not end at a period. The exchange
    /// is recorded only once the whole answer arrived; on failure the
    /// conversation is left as it was.
    pub async fn turn<F>(
        &self,
        conversation: &mut Conversation,
        question: &str,
        on_update: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let stream = self
            .engine
            .chat_stream(conversation.messages(), question)
            .await?;
        let answer = relay(stream, on_update).await?;
        conversation.record_exchange(question, &answer);
        Ok(answer)
    }

    /// Answer a side question, keeping it out of the main conversation
    pub async fn follow_up<F>(
        &self,
        conversation: &Conversation,
        log: &mut Conversation,
        question: &str,
        on_update: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let stream = self
            .engine
            .follow_up_stream(conversation.messages(), question)
            .await?;
        let answer = relay(stream, on_update).await?;
        log.record_exchange(question, &answer);
        Ok(answer)
    }

    /// Convert the latest answer into a solution record
    pub async fn structure(
        &self,
        conversation: &Conversation,
    ) -> Result<SolutionRecord, StructureError> {
        let (question, answer) = conversation
            .last_exchange()
            .ok_or(StructureError::NothingToStructure)?;

        let output = self
            .engine
            .structure(question, answer)
            .await
            .map_err(StructureError::Generation)?;

        let parsed: StructuredAnswer = serde_json::from_str(strip_code_fences(&output))
            .map_err(|source| StructureError::Malformed {
                source,
                output: output.clone(),
            })?;
        if parsed.steps.is_empty() {
            return Err(StructureError::NoSteps);
        }

        let record = SolutionRecord {
            id: None,
            problem_id: problem_slug(question),
            source: MODEL_SOURCE.to_string(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            steps: parsed.steps,
        };
        Dataset {
            solutions: vec![record.clone()],
            ..Default::default()
        }
        .validate()?;

        Ok(record)
    }
}

async fn relay<F>(mut stream: TextStream, mut on_update: F) -> Result<String>
where
    F: FnMut(&str),
{
    let mut buffer = SentenceBuffer::new();
    let mut raw = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.inspect_err(|e| tracing::error!("Stream interrupted: {:#}", e))?;
        raw.push_str(&chunk);
        if let Some(segment) = buffer.push(&chunk) {
            on_update(&segment);
        }
    }
    if let Some(rest) = buffer.finish() {
        on_update(&rest);
    }
    Ok(rewrite_latex(&raw))
}

/// Drop a surrounding ``` fence (with or without a language tag)
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = match inner.find('\n') {
        Some(newline) => &inner[newline + 1..],
        None => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Problem id derived from the question text, e.g. `solve_2x_4`
pub fn problem_slug(question: &str) -> String {
    let mut slug = String::new();
    for c in question.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
        if slug.len() >= 48 {
            break;
        }
    }
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "chat".to_string()
    } else {
        slug.to_string()
    }
}
