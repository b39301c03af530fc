//! Per-session conversation log

use crate::llm::{ChatMessage, Role};

/// Ordered turns of one chat session.
///
/// Owned by the session and handed to each turn by `&mut`; never shared.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Record a completed exchange
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.messages.push(ChatMessage::user(question));
        self.messages.push(ChatMessage::assistant(answer));
    }

    /// The most recent question together with the answer that followed it
    pub fn last_exchange(&self) -> Option<(&str, &str)> {
        let answer_at = self
            .messages
            .iter()
            .rposition(|m| m.role == Role::Assistant)?;
        let question = self.messages[..answer_at]
            .iter()
            .rev()
            .find(|m| m.role == Role::User)?;
        Some((&question.content, &self.messages[answer_at].content))
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
