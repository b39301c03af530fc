//! Chat front end: streamed tutoring turns over the generation engine
//!
//! Provides the conversation log, sentence-at-a-time display batching with
//! LaTeX delimiter rewriting, the structured-output transform and the
//! follow-up side channel used by the `tutor` terminal client.

pub mod conversation;
pub mod display;
pub mod session;

pub use conversation::Conversation;
pub use display::{rewrite_latex, SentenceBuffer};
pub use session::{ChatSession, StructureError};
