//! Shared domain types for Chatforge.
//!
//! This crate contains the value types used across the workspace:
//! the chatbot configuration, the conversation transcript, the wire shapes
//! of a chat-completion call, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chatbot;
pub mod config;
pub mod error;
pub mod llm;
pub mod transcript;
