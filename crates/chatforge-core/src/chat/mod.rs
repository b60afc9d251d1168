//! Conversation engine: prompts, payloads, conversation state and the async send path.

pub mod conversation;
pub mod engine;
pub mod payload;
pub mod prompt;
