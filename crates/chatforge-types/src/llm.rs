//! Chat-completion request/response types for Chatforge.
//!
//! These model the OpenAI-compatible wire shapes used by the preview
//! conversation: the outbound payload and the subset of the response we read.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Chat-completion endpoint used by default (Groq, OpenAI-compatible).
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Model requested by default.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Reply length cap for preview turns.
pub const DEFAULT_MAX_TOKENS: u32 = 100;

/// Sampling temperature for preview turns.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Temperatures the completion endpoint accepts.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=2.0;

/// Role of a message in a chat-completion conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in the outbound request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Body of a chat-completion request.
///
/// Field order matches the serialized JSON: `model`, `messages`,
/// `max_tokens`, `temperature`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// The subset of a chat-completion response that carries the reply text.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// `choices[0].message.content`, if present.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

/// Where and how preview completions are requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl CompletionSettings {
    /// Whether `temperature` is finite and inside [`TEMPERATURE_RANGE`].
    pub fn has_valid_temperature(&self) -> bool {
        TEMPERATURE_RANGE.contains(&self.temperature)
    }

    /// The configured temperature, or [`DEFAULT_TEMPERATURE`] when it is out of range.
    pub fn effective_temperature(&self) -> f64 {
        if self.has_valid_temperature() {
            self.temperature
        } else {
            DEFAULT_TEMPERATURE
        }
    }
}
