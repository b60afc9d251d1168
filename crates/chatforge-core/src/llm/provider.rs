//! CompletionProvider trait definition.
//!
//! This is the single I/O boundary of the conversation engine. Uses RPITIT
//! for `send_completion`; see `BoxCompletionProvider` for dynamic dispatch.

use secrecy::SecretString;

use chatforge_types::error::ChatError;
use chatforge_types::llm::RequestPayload;

/// Trait for chat-completion backends.
///
/// Implementations perform exactly one network call per invocation:
/// bearer-authenticated with `credential`, failing with
/// [`ChatError::Api`] (status + truncated body) on a non-success status and
/// returning `choices[0].message.content` on success.
///
/// Implementations live in chatforge-infra (e.g., `GroqProvider`).
pub trait CompletionProvider: Send + Sync {
    /// Human-readable provider name (e.g., "groq").
    fn name(&self) -> &str;

    /// Send one completion request and return the reply text.
    fn send_completion(
        &self,
        payload: &RequestPayload,
        credential: &SecretString,
    ) -> impl std::future::Future<Output = Result<String, ChatError>> + Send;
}
