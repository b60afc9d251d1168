//! Main chat loop orchestration.
//!
//! Loads the chatbot config, seeds the conversation with the welcome
//! message, then reads user lines from stdin until EOF or `/exit`. Replies
//! go through the shared `ConversationEngine`; Ctrl+C while a reply is
//! pending fires the turn's cancellation token instead of killing the loop.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use chatforge_core::chat::conversation::Conversation;
use chatforge_core::chat::prompt::{build_personality, config_summary};
use chatforge_types::chatbot::ChatbotConfig;
use chatforge_types::error::ChatError;
use chatforge_types::transcript::{Sender, TranscriptEntry};

use crate::cli::config::load_config;
use crate::state::AppState;

use super::commands::{self, ChatCommand};

fn display_name(config: &ChatbotConfig) -> &str {
    if config.chatbot_name.is_empty() {
        "Assistant"
    } else {
        &config.chatbot_name
    }
}

fn print_entry(config: &ChatbotConfig, entry: &TranscriptEntry) {
    match entry.sender {
        Sender::Bot => println!(
            "  {} {}",
            style(format!("{}:", display_name(config))).cyan().bold(),
            entry.text
        ),
        Sender::User => println!("  {} {}", style("you:").green().bold(), entry.text),
    }
}

fn print_banner(config: &ChatbotConfig, provider: &str, model: &str) {
    let personality = build_personality(config);
    println!();
    println!(
        "  {} Previewing {} ({} via {})",
        style("💬").bold(),
        style(display_name(config)).cyan().bold(),
        style(model).dim(),
        style(provider).dim()
    );
    println!("  {}", style(personality.role).dim());
    if !config.has_credential() {
        println!(
            "  {}",
            style("No API key configured: replies will show an error until you add one.")
                .yellow()
        );
    }
    println!("  {}", style("Type /help for commands").dim());
    println!();
}

fn prompt() -> std::io::Result<()> {
    print!("  {} ", style(">").green().bold());
    std::io::stdout().flush()
}

/// Run the interactive preview chat for the config at `config_path`.
pub async fn run_chat_loop(state: &AppState, config_path: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path).await?;
    let settings = state.global_config.completion.settings.clone();
    let model = settings.model.clone();
    let conversation = Mutex::new(Conversation::with_settings(settings, &config));

    print_banner(&config, state.engine.provider_name(), &model);
    if let Some(welcome) = conversation.lock().await.transcript().last() {
        print_entry(&config, welcome);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        prompt()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        if let Some(command) = commands::parse(&line) {
            match command {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Exit => break,
                ChatCommand::Reset => {
                    let mut conv = conversation.lock().await;
                    conv.reset(&config);
                    println!("  {}", style("Conversation reset.").dim());
                    if let Some(welcome) = conv.transcript().last() {
                        print_entry(&config, welcome);
                    }
                }
                ChatCommand::History => {
                    let conv = conversation.lock().await;
                    println!();
                    for entry in conv.transcript().entries() {
                        print_entry(&config, entry);
                    }
                }
                ChatCommand::Info => {
                    println!();
                    for (label, value) in config_summary(&config) {
                        println!("  {:<14} {}", format!("{label}:"), value);
                    }
                }
                ChatCommand::Unknown(cmd) => {
                    println!(
                        "  {} Unknown command {}. Type /help.",
                        style("?").yellow(),
                        style(cmd).bold()
                    );
                }
            }
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        match send_with_spinner(state, &conversation, &config, &line).await {
            Ok(entry) => print_entry(&config, &entry),
            Err(ChatError::Cancelled) => {
                println!("  {}", style("Reply cancelled.").dim());
            }
            Err(e) => {
                println!("  {} {e}", style("!").red().bold());
            }
        }
    }

    println!();
    println!("  {}", style("Goodbye!").dim());
    Ok(())
}

/// Send one message, showing a spinner until the reply arrives.
///
/// Ctrl+C fires the turn's cancellation token; the engine then abandons the
/// turn and returns `Cancelled`, so the in-flight guard is always released.
async fn send_with_spinner(
    state: &AppState,
    conversation: &Mutex<Conversation>,
    config: &ChatbotConfig,
    message: &str,
) -> Result<TranscriptEntry, ChatError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("{} is typing...", display_name(config)));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let started = Instant::now();
    let cancel = CancellationToken::new();
    let send = state
        .engine
        .send_message(conversation, config, message, &cancel);
    tokio::pin!(send);

    let result = loop {
        tokio::select! {
            result = &mut send => break result,
            _ = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
                debug!("Ctrl+C received, cancelling pending reply");
                cancel.cancel();
            }
        }
    };

    spinner.finish_and_clear();
    debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Turn finished");
    result
}
