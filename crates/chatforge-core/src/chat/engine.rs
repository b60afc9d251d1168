//! Async driver for preview conversations.
//!
//! ConversationEngine runs one turn end to end: it opens the turn under the
//! conversation lock, awaits the provider with the lock released, then
//! closes the turn under the lock again. Every completion call is wrapped in
//! a `gen_ai.complete` span.

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span, warn};

use chatforge_types::chatbot::ChatbotConfig;
use chatforge_types::error::ChatError;
use chatforge_types::transcript::TranscriptEntry;

use crate::llm::box_provider::BoxCompletionProvider;

use super::conversation::{Conversation, TurnStart};

/// Sends user messages on behalf of preview conversations.
///
/// Holds a `BoxCompletionProvider` so front ends can share one engine across
/// any number of conversations; each conversation carries its own guard.
pub struct ConversationEngine {
    provider: BoxCompletionProvider,
}

impl ConversationEngine {
    pub fn new(provider: BoxCompletionProvider) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Submit `message` to `conversation` and wait for the bot entry.
    ///
    /// `Busy` and `EmptyMessage` come back as errors with nothing appended.
    /// Provider failures and a missing credential are turned into a bot
    /// entry, which is returned like a normal reply. If `cancel` fires, or
    /// the conversation is reset or closed while the call is outstanding,
    /// nothing further is appended and `Cancelled` is returned. Dropping the
    /// returned future mid-call has the same effect on the conversation.
    pub async fn send_message(
        &self,
        conversation: &Mutex<Conversation>,
        config: &ChatbotConfig,
        message: &str,
        cancel: &CancellationToken,
    ) -> Result<TranscriptEntry, ChatError> {
        let start = conversation.lock().await.begin_turn(config, message)?;
        let pending = match start {
            TurnStart::Resolved(entry) => {
                debug!("Turn resolved locally without a completion call");
                return Ok(entry);
            }
            TurnStart::Pending(pending) => pending,
        };

        let outcome = {
            let span = info_span!(
                "gen_ai.complete",
                gen_ai.system = self.provider.name(),
                gen_ai.request.model = %pending.payload.model,
                gen_ai.request.max_tokens = pending.payload.max_tokens,
                gen_ai.request.temperature = pending.payload.temperature,
                gen_ai.request.messages = pending.payload.messages.len(),
            );
            let call = self
                .provider
                .send_completion(&pending.payload, &pending.credential)
                .instrument(span);

            tokio::select! {
                _ = cancel.cancelled() => None,
                result = call => Some(result),
            }
        };

        let mut conversation = conversation.lock().await;
        let Some(result) = outcome else {
            debug!("Completion call cancelled by caller");
            conversation.abandon_turn(pending);
            return Err(ChatError::Cancelled);
        };

        if let Err(ref err) = result {
            warn!(provider = self.provider.name(), error = %err, "Completion call failed");
        }

        match conversation.finish_turn(pending, result) {
            Some(entry) => Ok(entry.clone()),
            None => {
                debug!("Discarding completion result for a reset conversation");
                Err(ChatError::Cancelled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use secrecy::SecretString;
    use tokio::sync::Notify;

    use chatforge_types::llm::RequestPayload;
    use chatforge_types::transcript::Sender;

    use crate::llm::provider::CompletionProvider;

    /// Replies with a fixed result and counts calls.
    struct ScriptedProvider {
        reply: Result<String, ChatError>,
        calls: Arc<AtomicUsize>,
    }

    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send_completion(
            &self,
            _payload: &RequestPayload,
            _credential: &SecretString,
        ) -> Result<String, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    /// Blocks every call until `release` is notified.
    struct GatedProvider {
        started: Arc<Notify>,
        release: Arc<Notify>,
        calls: Arc<AtomicUsize>,
    }

    impl CompletionProvider for GatedProvider {
        fn name(&self) -> &str {
            "gated"
        }

        async fn send_completion(
            &self,
            payload: &RequestPayload,
            _credential: &SecretString,
        ) -> Result<String, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            let last = payload.messages.last().map(|m| m.content.as_str()).unwrap_or("");
            Ok(format!("reply to {last}"))
        }
    }

    struct Gate {
        started: Arc<Notify>,
        release: Arc<Notify>,
        calls: Arc<AtomicUsize>,
    }

    fn gated_engine() -> (Arc<ConversationEngine>, Gate) {
        let gate = Gate {
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            calls: Arc::new(AtomicUsize::new(0)),
        };
        let provider = GatedProvider {
            started: gate.started.clone(),
            release: gate.release.clone(),
            calls: gate.calls.clone(),
        };
        (
            Arc::new(ConversationEngine::new(BoxCompletionProvider::new(provider))),
            gate,
        )
    }

    fn scripted_engine(reply: Result<String, ChatError>) -> (ConversationEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ScriptedProvider {
            reply,
            calls: calls.clone(),
        };
        (ConversationEngine::new(BoxCompletionProvider::new(provider)), calls)
    }

    fn keyed_config() -> ChatbotConfig {
        ChatbotConfig {
            api_key: "gsk_test".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_send_message_appends_reply() {
        let (engine, calls) = scripted_engine(Ok("Sure thing!".to_string()));
        let config = keyed_config();
        let conversation = Mutex::new(Conversation::start(&config));

        let entry = engine
            .send_message(&conversation, &config, "hi", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(entry, TranscriptEntry::bot("Sure thing!"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let conv = conversation.lock().await;
        let senders: Vec<Sender> = conv.transcript().entries().iter().map(|e| e.sender).collect();
        assert_eq!(senders, vec![Sender::Bot, Sender::User, Sender::Bot]);
        assert!(!conv.is_in_flight());
    }

    #[tokio::test]
    async fn test_api_error_becomes_transcript_entry() {
        let (engine, _calls) = scripted_engine(Err(ChatError::api(429, "rate limited")));
        let config = keyed_config();
        let conversation = Mutex::new(Conversation::start(&config));

        let entry = engine
            .send_message(&conversation, &config, "hi", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(entry.sender, Sender::Bot);
        assert!(entry.text.contains("429"));
        assert!(entry.text.contains("rate limited"));
        assert_eq!(conversation.lock().await.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_credential_skips_provider() {
        let (engine, calls) = scripted_engine(Ok("unused".to_string()));
        let config = ChatbotConfig {
            api_key: "   ".to_string(),
            ..Default::default()
        };
        let conversation = Mutex::new(Conversation::start(&config));

        let entry = engine
            .send_message(&conversation, &config, "hi", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(entry.text, "❌ Add your Groq API key first!");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let (engine, calls) = scripted_engine(Ok("unused".to_string()));
        let config = keyed_config();
        let conversation = Mutex::new(Conversation::start(&config));

        let err = engine
            .send_message(&conversation, &config, "  ", &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err, ChatError::EmptyMessage);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(conversation.lock().await.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_second_message_while_pending_is_busy() {
        let (engine, gate) = gated_engine();
        let config = keyed_config();
        let conversation = Arc::new(Mutex::new(Conversation::start(&config)));

        let first = {
            let engine = engine.clone();
            let conversation = conversation.clone();
            let config = config.clone();
            tokio::spawn(async move {
                engine
                    .send_message(&conversation, &config, "first", &CancellationToken::new())
                    .await
            })
        };
        gate.started.notified().await;

        let err = engine
            .send_message(&conversation, &config, "second", &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, ChatError::Busy);
        assert_eq!(gate.calls.load(Ordering::SeqCst), 1);

        gate.release.notify_one();
        let entry = first.await.unwrap().unwrap();
        assert_eq!(entry.text, "reply to first");

        let conv = conversation.lock().await;
        let texts: Vec<&str> = conv
            .transcript()
            .entries()
            .iter()
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(texts[1..], ["first", "reply to first"]);
        assert_eq!(gate.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancellation_leaves_transcript_untouched() {
        let (engine, gate) = gated_engine();
        let config = keyed_config();
        let conversation = Arc::new(Mutex::new(Conversation::start(&config)));
        let cancel = CancellationToken::new();

        let task = {
            let engine = engine.clone();
            let conversation = conversation.clone();
            let config = config.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                engine
                    .send_message(&conversation, &config, "hello", &cancel)
                    .await
            })
        };
        gate.started.notified().await;
        cancel.cancel();

        assert_eq!(task.await.unwrap().unwrap_err(), ChatError::Cancelled);
        let conv = conversation.lock().await;
        assert_eq!(conv.transcript().len(), 2);
        assert_eq!(conv.transcript().last().unwrap(), &TranscriptEntry::user("hello"));
        assert!(!conv.is_in_flight());
    }

    #[tokio::test]
    async fn test_reset_discards_late_reply() {
        let (engine, gate) = gated_engine();
        let config = keyed_config();
        let conversation = Arc::new(Mutex::new(Conversation::start(&config)));

        let task = {
            let engine = engine.clone();
            let conversation = conversation.clone();
            let config = config.clone();
            tokio::spawn(async move {
                engine
                    .send_message(&conversation, &config, "hello", &CancellationToken::new())
                    .await
            })
        };
        gate.started.notified().await;
        conversation.lock().await.reset(&config);
        gate.release.notify_one();

        assert_eq!(task.await.unwrap().unwrap_err(), ChatError::Cancelled);
        let conv = conversation.lock().await;
        assert_eq!(conv.transcript().len(), 1);
        assert_eq!(conv.transcript().entries()[0].sender, Sender::Bot);
    }

    #[test]
    fn test_provider_name() {
        let (engine, _calls) = scripted_engine(Ok(String::new()));
        assert_eq!(engine.provider_name(), "scripted");
    }

    #[tokio::test]
    async fn test_dropped_send_frees_conversation() {
        let (engine, gate) = gated_engine();
        let config = keyed_config();
        let conversation = Arc::new(Mutex::new(Conversation::start(&config)));

        let timed_out = tokio::time::timeout(
            Duration::from_millis(50),
            engine.send_message(&conversation, &config, "hello", &CancellationToken::new()),
        )
        .await;
        assert!(timed_out.is_err());
        gate.started.notified().await;

        {
            let conv = conversation.lock().await;
            assert!(!conv.is_in_flight());
            assert_eq!(conv.transcript().len(), 2);
        }

        let second = {
            let engine = engine.clone();
            let conversation = conversation.clone();
            let config = config.clone();
            tokio::spawn(async move {
                engine
                    .send_message(&conversation, &config, "again", &CancellationToken::new())
                    .await
            })
        };
        gate.started.notified().await;
        gate.release.notify_one();

        let entry = second.await.unwrap().unwrap();
        assert_eq!(entry.text, "reply to again");
        assert_eq!(gate.calls.load(Ordering::SeqCst), 2);
    }
}
