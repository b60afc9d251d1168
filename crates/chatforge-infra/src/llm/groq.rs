//! Groq chat-completions client.
//!
//! Implements [`CompletionProvider`] against Groq's OpenAI-compatible
//! `/chat/completions` endpoint with a plain reqwest client. Any endpoint
//! speaking the same wire format works, which is how the tests point it at
//! a local mock server.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};

use chatforge_core::llm::provider::CompletionProvider;
use chatforge_types::config::CompletionConfig;
use chatforge_types::error::ChatError;
use chatforge_types::llm::{ChatCompletionResponse, RequestPayload};

/// Groq completion provider.
///
/// The credential is passed per call rather than stored, since every
/// chatbot configuration carries its own key. It is only exposed when
/// building the `Authorization` header.
pub struct GroqProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl GroqProvider {
    pub const NAME: &'static str = "groq";

    /// Create a provider posting to `endpoint`, abandoning calls after `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create a provider from the `[completion]` table of `config.toml`.
    pub fn from_config(config: &CompletionConfig) -> Result<Self, ChatError> {
        Self::new(
            config.settings.endpoint.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CompletionProvider for GroqProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn send_completion(
        &self,
        payload: &RequestPayload,
        credential: &SecretString,
    ) -> Result<String, ChatError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Network("request timed out".to_string())
                } else {
                    ChatError::Network(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "Completion endpoint returned an error");
            return Err(ChatError::api(status.as_u16(), &error_body));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            ChatError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        parsed.first_content().map(str::to_string).ok_or_else(|| {
            ChatError::Deserialization("response has no choices[0].message.content".to_string())
        })
    }
}
