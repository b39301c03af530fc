//! Fixed prompt templates sent to the model

use crate::llm::{ChatMessage, Role};

const STEP_INSTRUCTION: &str = "Solve with clear and rich explanation for a student, that has a serious backlog. In the form of steps: Step1, Step2...";

/// Single-shot prompt for one problem
pub fn solve_prompt(problem: &str) -> String {
    format!("{STEP_INSTRUCTION} The problem: {problem}")
}

/// Chat prompt: the instruction, the prior turns and the new question
pub fn chat_prompt(history: &[ChatMessage], question: &str) -> String {
    format!(
        "{STEP_INSTRUCTION}\nChat history: {}\n\nUser question: {question}",
        render_history(history)
    )
}

/// Side question answered against the main conversation
pub fn follow_up_prompt(context: &[ChatMessage], question: &str) -> String {
    format!(
        "You are helping a student who is working through the tutoring conversation below. \
         Answer their follow-up question briefly and clearly, referring to the steps already given.\n\
         Conversation: {}\n\nFollow-up question: {question}",
        render_history(context)
    )
}

/// Conversion of a free-text worked answer into the solution record schema
pub fn structure_prompt(problem: &str, answer: &str) -> String {
    format!(
        "Convert the worked solution below into JSON with exactly this shape and nothing else:\n\
         {{\"steps\": [{{\"step_number\": 1, \"step_explanation\": \"...\", \"math_transformation\": \"...\", \"related_concepts\": [\"...\"]}}]}}\n\
         Use lowercase concept names. Respond with JSON only.\n\n\
         Problem: {problem}\n\nSolution:\n{answer}"
    )
}

/// Render turns as `Human: ...` / `AI: ...` lines
pub fn render_history(history: &[ChatMessage]) -> String {
    if history.is_empty() {
        return "(none)".to_string();
    }
    history
        .iter()
        .map(|m| {
            let who = match m.role {
                Role::User => "Human",
                Role::Assistant => "AI",
            };
            format!("{}: {}", who, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
