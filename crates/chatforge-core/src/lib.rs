//! Business logic and provider trait definitions for Chatforge.
//!
//! This crate defines the `CompletionProvider` port that the infrastructure
//! layer implements, plus the two pure pieces of the system: the
//! conversation engine (prompt and payload construction, transcript
//! bookkeeping) and the embed packager. It depends only on `chatforge-types`
//! -- never on `chatforge-infra` or any HTTP crate.

pub mod chat;
pub mod embed;
pub mod llm;
