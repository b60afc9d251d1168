//! Terminal preview chat (`chatforge chat`).

pub mod commands;
pub mod loop_runner;

pub use loop_runner::run_chat_loop;
