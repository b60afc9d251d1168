//! Infrastructure layer for Chatforge.
//!
//! Contains the concrete implementations behind `chatforge-core`: the Groq
//! HTTP completion provider, the `config.toml` loader, data-directory
//! resolution, environment credential lookup and chatbot config files.

pub mod config;
pub mod credential;
pub mod filesystem;
pub mod llm;
