//! Chatbot configuration commands: init, set, toggle-feature, show, catalog.

use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatforge_core::chat::prompt::{build_personality, build_welcome_message, config_summary};
use chatforge_infra::credential::{API_KEY_ENV, default_api_key, new_chatbot_config};
use chatforge_infra::filesystem::{load_chatbot_config, save_chatbot_config};
use chatforge_types::chatbot::{ChatbotConfig, Feature, mask_credential};

use crate::catalog::CatalogOption;
use crate::state::AppState;

/// Load a chatbot config, pointing at `init` when the file is missing.
pub async fn load_config(path: &Path) -> Result<ChatbotConfig> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        bail!(
            "No chatbot config at {}. Create one with: chatforge init (or chatforge wizard)",
            path.display()
        );
    }
    load_chatbot_config(path)
        .await
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// Write a default chatbot configuration.
pub async fn init_config(state: &AppState, output: &Path, force: bool, json: bool) -> Result<()> {
    if !force && tokio::fs::try_exists(output).await.unwrap_or(false) {
        bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let api_key = default_api_key();
    let from_env = api_key.is_some();
    let config = new_chatbot_config(&state.global_config, api_key);
    save_chatbot_config(output, &config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Wrote {}",
        style("✓").green().bold(),
        style(output.display()).cyan()
    );
    if from_env {
        println!("  API key taken from {}", style(API_KEY_ENV).bold());
    } else {
        println!(
            "  {}",
            style(format!(
                "No API key set. Add one with: chatforge set apiKey <KEY> (or export {API_KEY_ENV})"
            ))
            .dim()
        );
    }
    println!();
    Ok(())
}

/// Set one field and save.
pub async fn set_field(path: &Path, field: &str, value: &str, json: bool) -> Result<()> {
    let mut config = load_config(path).await?;
    config.set_field(field, value)?;
    save_chatbot_config(path, &config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let shown = if field.to_lowercase().replace(['_', '-'], "") == "apikey" {
        mask_credential(value)
    } else {
        value.to_string()
    };
    println!(
        "  {} {} = {}",
        style("✓").green().bold(),
        style(field).bold(),
        style(shown).cyan()
    );
    Ok(())
}

/// Toggle a feature and save.
pub async fn toggle_feature(path: &Path, feature: &str, json: bool) -> Result<()> {
    let feature: Feature = feature.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let mut config = load_config(path).await?;
    let enabled = config.features.toggle(feature);
    save_chatbot_config(path, &config).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "feature": feature,
                "enabled": enabled,
                "features": config.features,
            }))?
        );
        return Ok(());
    }

    let state = if enabled {
        style("enabled").green()
    } else {
        style("disabled").yellow()
    };
    println!("  {} {}", style(feature.label()).bold(), state);
    Ok(())
}

/// Print the configuration summary, personality and welcome message.
pub async fn show_config(path: &Path, json: bool) -> Result<()> {
    let config = load_config(path).await?;
    let personality = build_personality(&config);
    let welcome = build_welcome_message(&config);

    if json {
        let mut value = serde_json::to_value(&config)?;
        value["apiKey"] = serde_json::Value::String(mask_credential(&config.api_key));
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "config": value,
                "personality": { "role": personality.role, "tone": personality.tone },
                "welcomeMessage": welcome,
            }))?
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);
    for (label, value) in config_summary(&config) {
        table.add_row(vec![Cell::new(label).fg(Color::Cyan), Cell::new(value)]);
    }
    table.add_row(vec![
        Cell::new("Primary Color").fg(Color::Cyan),
        Cell::new(&config.primary_color),
    ]);
    table.add_row(vec![
        Cell::new("API Key").fg(Color::Cyan),
        Cell::new(mask_credential(&config.api_key)).fg(Color::DarkGrey),
    ]);

    println!();
    println!("{table}");
    println!();
    println!("  {}", style("Personality").bold());
    println!("  {}", personality.role);
    println!("  {}", personality.tone);
    println!();
    println!("  {}", style("Welcome message").bold());
    println!("  {}", style(welcome).cyan());
    println!();
    Ok(())
}

/// Print every selectable value.
pub fn print_catalog(json: bool) -> Result<()> {
    let catalog = crate::catalog::catalog();
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::White),
        Cell::new("Value").fg(Color::White),
        Cell::new("Label").fg(Color::White),
    ]);

    let mut section = |name: &str, rows: &[CatalogOption]| {
        for (i, row) in rows.iter().enumerate() {
            let heading = if i == 0 { name } else { "" };
            table.add_row(vec![
                Cell::new(heading).fg(Color::Cyan),
                Cell::new(&row.id).fg(Color::Yellow),
                Cell::new(row.label),
            ]);
        }
    };
    section("websiteType", &catalog.website_types);
    section("purpose", &catalog.purposes);
    section("tone", &catalog.tones);
    section("features", &catalog.features);
    for (i, industry) in catalog.industries.iter().enumerate() {
        let heading = if i == 0 { "industry" } else { "" };
        table.add_row(vec![
            Cell::new(heading).fg(Color::Cyan),
            Cell::new(industry).fg(Color::Yellow),
            Cell::new(""),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}
