use thiserror::Error;

/// Maximum number of characters of a failed response body kept in [`ChatError::Api`].
pub const ERROR_BODY_LIMIT: usize = 100;

/// Errors raised while running a conversation turn.
///
/// `MissingCredential`, `Api`, `Network` and `Deserialization` are recovered
/// at the conversation boundary and shown as bot transcript entries.
/// `EmptyMessage` and `Busy` reject a submission before anything is appended.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("credential missing")]
    MissingCredential,

    #[error("message is empty")]
    EmptyMessage,

    #[error("a reply is already being generated for this conversation")]
    Busy,

    #[error("API {status}: {body}")]
    Api { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Deserialization(String),

    #[error("request cancelled")]
    Cancelled,
}

impl ChatError {
    /// Build an [`ChatError::Api`] keeping only the first
    /// [`ERROR_BODY_LIMIT`] characters of the response body.
    pub fn api(status: u16, body: &str) -> Self {
        ChatError::Api {
            status,
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        }
    }

    /// Text of the bot transcript entry that reports this error.
    pub fn transcript_text(&self) -> String {
        match self {
            ChatError::MissingCredential => "❌ Add your Groq API key first!".to_string(),
            other => format!("⚠️ Error: {other}"),
        }
    }
}

/// Errors related to editing, importing or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown config field '{0}'")]
    UnknownField(String),

    #[error("{0}")]
    InvalidValue(String),

    #[error("invalid color '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),

    #[error("invalid config document: {0}")]
    Parse(String),
}
