//! Embed and export commands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use console::style;

use chatforge_core::chat::prompt::{build_embed_directive, build_welcome_message};
use chatforge_core::embed::{
    CONFIG_FILE_NAME, HTML_FILE_NAME, PLAINTEXT_CREDENTIAL_WARNING, export_config_json,
    generate_embed_for, wrap_as_standalone_html,
};
use chatforge_infra::filesystem::write_file;
use chatforge_types::chatbot::ChatbotConfig;

use crate::cli::ExportFormat;
use crate::cli::config::load_config;
use crate::state::AppState;

fn warn_plaintext(config: &ChatbotConfig) {
    if config.has_credential() {
        eprintln!(
            "  {} {}",
            style("⚠").yellow().bold(),
            style(PLAINTEXT_CREDENTIAL_WARNING).yellow()
        );
    }
}

fn report_written(path: &Path, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "written": path.display().to_string() }));
    } else {
        println!(
            "  {} Wrote {}",
            style("✓").green().bold(),
            style(path.display()).cyan()
        );
    }
}

/// Print or write the widget snippet (or the standalone page with `html`).
pub async fn embed(
    state: &AppState,
    config_path: &Path,
    html: bool,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path).await?;
    let snippet = generate_embed_for(&state.global_config.completion.settings, &config);
    let content = if html {
        wrap_as_standalone_html(&snippet)
    } else {
        snippet
    };

    warn_plaintext(&config);

    match output {
        Some(path) => {
            write_file(&path, &content).await?;
            report_written(&path, json);
        }
        None if json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "welcomeMessage": build_welcome_message(&config),
                    "systemPrompt": build_embed_directive(&config),
                    "snippet": content,
                }))?
            );
        }
        None => print!("{content}"),
    }
    Ok(())
}

/// Write the config JSON or the standalone page to a file.
pub async fn export(
    state: &AppState,
    format: ExportFormat,
    config_path: &Path,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path).await?;

    let (content, default_name) = match format {
        ExportFormat::Config => (format!("{}\n", export_config_json(&config)?), CONFIG_FILE_NAME),
        ExportFormat::Html => {
            let snippet = generate_embed_for(&state.global_config.completion.settings, &config);
            (wrap_as_standalone_html(&snippet), HTML_FILE_NAME)
        }
    };
    let path = output.unwrap_or_else(|| PathBuf::from(default_name));

    warn_plaintext(&config);
    write_file(&path, &content).await?;
    report_written(&path, json);
    Ok(())
}
