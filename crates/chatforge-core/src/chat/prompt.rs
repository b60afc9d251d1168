//! Prompt construction for the preview conversation.
//!
//! Everything here is a pure function of [`ChatbotConfig`]: the system
//! directive sent with every completion call, the welcome message that
//! seeds a fresh transcript, and the descriptive personality/summary lines
//! shown by the front ends.

use chatforge_types::chatbot::{ChatbotConfig, Purpose, Tone, WebsiteType};

pub(crate) const DEFAULT_CHATBOT_NAME: &str = "Assistant";
pub(crate) const DEFAULT_DIRECTIVE_COMPANY: &str = "this company";
const DEFAULT_WELCOME_COMPANY: &str = "our site";
const DEFAULT_WEBSITE_URL: &str = "N/A";
const NOT_SPECIFIED: &str = "Not specified";

pub(crate) const BREVITY_CLAUSE: &str = "Keep responses short (1-2 sentences).";
pub(crate) const EMOJI_CLAUSE: &str = " Use friendly emojis.";

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Build the system directive for the in-tool preview.
///
/// ```text
/// You are a {purpose} chatbot named "{name}" for a {website type} website.
/// Company: {company}. Website: {url}. Tone: {tone}. Keep responses short (1-2 sentences).
/// ```
///
/// All on one line; ` Use friendly emojis.` is appended for the friendly tone.
pub fn build_system_directive(config: &ChatbotConfig) -> String {
    let mut directive = format!(
        "You are a {} chatbot named \"{}\" for a {} website. Company: {}. Website: {}. Tone: {}. {BREVITY_CLAUSE}",
        config.purpose,
        or_default(&config.chatbot_name, DEFAULT_CHATBOT_NAME),
        config.website_type,
        or_default(&config.company_name, DEFAULT_DIRECTIVE_COMPANY),
        or_default(&config.website_url, DEFAULT_WEBSITE_URL),
        config.tone,
    );
    if config.tone == Tone::Friendly {
        directive.push_str(EMOJI_CLAUSE);
    }
    directive
}

/// Build the system directive baked into exported widgets.
///
/// Same fields as [`build_system_directive`] minus the website type and the
/// website URL; the exported widget has always been generated without them.
/// The widget's `buildSystemPrompt` assembles the same string in the browser.
pub fn build_embed_directive(config: &ChatbotConfig) -> String {
    let mut directive = format!(
        "You are a {} chatbot named \"{}\" for {}. Tone: {}. {BREVITY_CLAUSE}",
        config.purpose,
        or_default(&config.chatbot_name, DEFAULT_CHATBOT_NAME),
        or_default(&config.company_name, DEFAULT_DIRECTIVE_COMPANY),
        config.tone,
    );
    if config.tone == Tone::Friendly {
        directive.push_str(EMOJI_CLAUSE);
    }
    directive
}

/// Build the first bot message of a fresh transcript.
///
/// One of six fixed templates: a tone-driven greeting followed by a
/// purpose-driven sentence. Only the leads template mentions the company.
pub fn build_welcome_message(config: &ChatbotConfig) -> String {
    let greeting = match config.tone {
        Tone::Friendly => "👋 Hi there!",
        Tone::Professional => "Hello!",
    };

    match config.purpose {
        Purpose::Support => {
            format!("{greeting} I'm here to help you. What can I assist you with today?")
        }
        Purpose::Leads => format!(
            "{greeting} Welcome to {}! I'd love to learn how we can help you.",
            or_default(&config.company_name, DEFAULT_WELCOME_COMPANY)
        ),
        Purpose::Faq => format!(
            "{greeting} Have questions? I'm here to help! Feel free to ask me anything."
        ),
    }
}

/// First-person description of what the chatbot does and how it talks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Personality {
    pub role: &'static str,
    pub tone: &'static str,
}

/// Look up the personality lines for a website type / purpose / tone.
pub fn build_personality(config: &ChatbotConfig) -> Personality {
    let role = match (config.website_type, config.purpose) {
        (WebsiteType::Portfolio, Purpose::Support) => {
            "I help visitors learn about my owner's work and connect with them."
        }
        (WebsiteType::Portfolio, Purpose::Leads) => {
            "I help potential clients get in touch and schedule consultations."
        }
        (WebsiteType::Portfolio, Purpose::Faq) => {
            "I answer questions about services, experience, and availability."
        }
        (WebsiteType::Ecommerce, Purpose::Support) => {
            "I assist customers with orders, shipping, and product questions."
        }
        (WebsiteType::Ecommerce, Purpose::Leads) => {
            "I help new customers discover products and special offers."
        }
        (WebsiteType::Ecommerce, Purpose::Faq) => {
            "I provide information about products, policies, and store details."
        }
        (WebsiteType::Business, Purpose::Support) => {
            "I help clients with inquiries and support requests."
        }
        (WebsiteType::Business, Purpose::Leads) => {
            "I qualify leads and schedule meetings with the sales team."
        }
        (WebsiteType::Business, Purpose::Faq) => {
            "I answer common questions about our services and company."
        }
    };

    let tone = match config.tone {
        Tone::Friendly => {
            "I communicate in a warm, approachable way with emojis when appropriate."
        }
        Tone::Professional => "I maintain a polished, business-appropriate tone.",
    };

    Personality { role, tone }
}

/// Label/value rows describing a configuration, in display order.
///
/// Empty text fields read "Not specified"; an empty feature set reads "None".
pub fn config_summary(config: &ChatbotConfig) -> Vec<(&'static str, String)> {
    let features = if config.features.is_empty() {
        "None".to_string()
    } else {
        config
            .features
            .iter()
            .map(|f| f.id())
            .collect::<Vec<_>>()
            .join(", ")
    };

    vec![
        ("Company", or_default(&config.company_name, NOT_SPECIFIED).to_string()),
        ("Chatbot Name", or_default(&config.chatbot_name, NOT_SPECIFIED).to_string()),
        ("Website URL", or_default(&config.website_url, NOT_SPECIFIED).to_string()),
        ("Industry", or_default(&config.industry, NOT_SPECIFIED).to_string()),
        ("Type", config.website_type.to_string()),
        ("Purpose", config.purpose.to_string()),
        ("Tone", config.tone.to_string()),
        ("Features", features),
    ]
}
