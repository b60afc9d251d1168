//! Interactive configuration wizard (`chatforge wizard`).
//!
//! Three steps with dialoguer prompts: identity (company, bot name, site,
//! industry, website type), behavior (purpose, tone, features) and
//! appearance (accent color, API key). Ends with the summary, personality
//! and welcome message, then saves the config.

use std::path::Path;

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};

use chatforge_core::chat::prompt::{build_personality, build_welcome_message, config_summary};
use chatforge_infra::credential::{API_KEY_ENV, default_api_key, new_chatbot_config};
use chatforge_infra::filesystem::save_chatbot_config;
use chatforge_types::chatbot::{
    ChatbotConfig, Feature, FeatureSet, INDUSTRIES, Purpose, Tone, WebsiteType,
    is_valid_hex_color,
};

use crate::state::AppState;

fn step_header(number: u8, title: &str) {
    println!();
    println!(
        "  {} {}",
        style(format!("Step {number}/3")).cyan().bold(),
        style(title).bold()
    );
    println!();
}

/// Run the wizard and write the result to `output`.
pub async fn run_wizard(state: &AppState, output: &Path) -> Result<()> {
    let mut config = new_chatbot_config(&state.global_config, None);

    step_header(1, "Identity");
    collect_identity(&mut config)?;

    step_header(2, "Behavior");
    collect_behavior(&mut config)?;

    step_header(3, "Appearance & API key");
    collect_appearance(&mut config)?;

    save_chatbot_config(output, &config).await?;
    print_summary(&config);
    println!(
        "  {} Saved to {}",
        style("✓").green().bold(),
        style(output.display()).cyan()
    );
    println!(
        "  {}",
        style("Try it with: chatforge chat, then export with: chatforge export html").dim()
    );
    println!();
    Ok(())
}

fn collect_identity(config: &mut ChatbotConfig) -> Result<()> {
    config.company_name = Input::<String>::new()
        .with_prompt("Company name")
        .allow_empty(true)
        .interact_text()?;

    config.chatbot_name = Input::<String>::new()
        .with_prompt("Chatbot name (e.g. Alex, Support Bot)")
        .allow_empty(true)
        .interact_text()?;

    config.website_url = Input::<String>::new()
        .with_prompt("Website URL")
        .allow_empty(true)
        .interact_text()?;

    let mut industries = vec!["(skip)"];
    industries.extend(INDUSTRIES);
    let industry = Select::new()
        .with_prompt("Industry")
        .items(&industries)
        .default(0)
        .interact()?;
    config.industry = if industry == 0 {
        String::new()
    } else {
        industries[industry].to_string()
    };

    let labels: Vec<&str> = WebsiteType::ALL.iter().map(|t| t.label()).collect();
    let selected = Select::new()
        .with_prompt("Website type")
        .items(&labels)
        .default(0)
        .interact()?;
    config.website_type = WebsiteType::ALL[selected];
    Ok(())
}

fn collect_behavior(config: &mut ChatbotConfig) -> Result<()> {
    let labels: Vec<&str> = Purpose::ALL.iter().map(|p| p.label()).collect();
    let selected = Select::new()
        .with_prompt("Primary purpose")
        .items(&labels)
        .default(0)
        .interact()?;
    config.purpose = Purpose::ALL[selected];

    let labels: Vec<&str> = Tone::ALL.iter().map(|t| t.label()).collect();
    let selected = Select::new()
        .with_prompt("Communication tone")
        .items(&labels)
        .default(0)
        .interact()?;
    config.tone = Tone::ALL[selected];

    let labels: Vec<&str> = Feature::ALL.iter().map(|f| f.label()).collect();
    let chosen = MultiSelect::new()
        .with_prompt("Features (space to toggle, enter to confirm)")
        .items(&labels)
        .interact()?;
    config.features = chosen.into_iter().map(|i| Feature::ALL[i]).collect::<FeatureSet>();
    Ok(())
}

fn collect_appearance(config: &mut ChatbotConfig) -> Result<()> {
    config.primary_color = Input::<String>::new()
        .with_prompt("Primary color")
        .default(config.primary_color.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if is_valid_hex_color(input) {
                Ok(())
            } else {
                Err("expected a hex color like #007bff")
            }
        })
        .interact_text()?;

    if let Some(env_key) = default_api_key() {
        let use_env = Confirm::new()
            .with_prompt(format!("Use the API key from {API_KEY_ENV}?"))
            .default(true)
            .interact()?;
        if use_env {
            config.api_key = env_key;
            return Ok(());
        }
    }

    config.api_key = Password::new()
        .with_prompt("Groq API key (leave empty to add later)")
        .allow_empty_password(true)
        .interact()?;
    Ok(())
}

fn print_summary(config: &ChatbotConfig) {
    let personality = build_personality(config);

    println!();
    println!("  {}", style("Configuration").bold());
    for (label, value) in config_summary(config) {
        println!("  {:<14} {}", style(format!("{label}:")).dim(), value);
    }
    println!();
    println!("  {}", style("Personality").bold());
    println!("  {}", personality.role);
    println!("  {}", personality.tone);
    println!();
    println!("  {}", style("Welcome message").bold());
    println!("  {}", style(build_welcome_message(config)).cyan());
    println!();
}
