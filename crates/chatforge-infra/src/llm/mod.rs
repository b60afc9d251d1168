//! Completion provider implementations.

pub mod groq;
