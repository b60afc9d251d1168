//! BoxCompletionProvider -- object-safe dynamic dispatch wrapper for CompletionProvider.
//!
//! 1. Define an object-safe `CompletionProviderDyn` trait with boxed futures
//! 2. Blanket-impl `CompletionProviderDyn` for all `T: CompletionProvider`
//! 3. `BoxCompletionProvider` wraps `Box<dyn CompletionProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use secrecy::SecretString;

use chatforge_types::error::ChatError;
use chatforge_types::llm::RequestPayload;

use super::provider::CompletionProvider;

/// Object-safe version of [`CompletionProvider`] with boxed futures.
pub trait CompletionProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn send_completion_boxed<'a>(
        &'a self,
        payload: &'a RequestPayload,
        credential: &'a SecretString,
    ) -> Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>>;
}

/// Blanket implementation: any `CompletionProvider` is a `CompletionProviderDyn`.
impl<T: CompletionProvider> CompletionProviderDyn for T {
    fn name(&self) -> &str {
        CompletionProvider::name(self)
    }

    fn send_completion_boxed<'a>(
        &'a self,
        payload: &'a RequestPayload,
        credential: &'a SecretString,
    ) -> Pin<Box<dyn Future<Output = Result<String, ChatError>> + Send + 'a>> {
        Box::pin(self.send_completion(payload, credential))
    }
}

/// Type-erased completion provider for runtime provider selection.
///
/// Lets the CLI and the REST server hold the real HTTP provider while tests
/// plug in scripted providers, without making every caller generic.
pub struct BoxCompletionProvider {
    inner: Box<dyn CompletionProviderDyn + Send + Sync>,
}

impl BoxCompletionProvider {
    /// Wrap a concrete `CompletionProvider` in a type-erased box.
    pub fn new<T: CompletionProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send one completion request and return the reply text.
    pub async fn send_completion(
        &self,
        payload: &RequestPayload,
        credential: &SecretString,
    ) -> Result<String, ChatError> {
        self.inner.send_completion_boxed(payload, credential).await
    }
}
