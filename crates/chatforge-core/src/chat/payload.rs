//! Request payload assembly for completion calls.

use chatforge_types::chatbot::ChatbotConfig;
use chatforge_types::error::ChatError;
use chatforge_types::llm::{ChatMessage, CompletionSettings, MessageRole, RequestPayload};
use chatforge_types::transcript::Transcript;

use super::prompt::build_system_directive;

/// Assemble the completion request for `new_user_message` with the default
/// endpoint settings (fixed model, `max_tokens` 100, temperature 0.7).
///
/// See [`build_request_payload_with`].
pub fn build_request_payload(
    config: &ChatbotConfig,
    transcript: &Transcript,
    new_user_message: &str,
) -> Result<RequestPayload, ChatError> {
    build_request_payload_with(
        &CompletionSettings::default(),
        config,
        transcript,
        new_user_message,
    )
}

/// Assemble the completion request for `new_user_message`.
///
/// Message order is fixed: the system directive, then every transcript
/// entry oldest first (user -> `user`, bot -> `assistant`), then the new
/// user message last. `transcript` must not already contain the new message.
///
/// Fails with [`ChatError::EmptyMessage`] for a blank message and
/// [`ChatError::MissingCredential`] when the config has no usable credential.
pub fn build_request_payload_with(
    settings: &CompletionSettings,
    config: &ChatbotConfig,
    transcript: &Transcript,
    new_user_message: &str,
) -> Result<RequestPayload, ChatError> {
    if new_user_message.trim().is_empty() {
        return Err(ChatError::EmptyMessage);
    }
    if !config.has_credential() {
        return Err(ChatError::MissingCredential);
    }

    let mut messages = Vec::with_capacity(transcript.len() + 2);
    messages.push(ChatMessage::new(
        MessageRole::System,
        build_system_directive(config),
    ));
    messages.extend(
        transcript
            .entries()
            .iter()
            .map(|entry| ChatMessage::new(entry.sender.role(), entry.text.clone())),
    );
    messages.push(ChatMessage::new(MessageRole::User, new_user_message));

    Ok(RequestPayload {
        model: settings.model.clone(),
        messages,
        max_tokens: settings.max_tokens,
        temperature: settings.effective_temperature(),
    })
}
