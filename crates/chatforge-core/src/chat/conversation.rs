//! Caller-owned conversation state for the live preview.
//!
//! A `Conversation` pairs the transcript with a single in-flight guard and a
//! generation counter. A turn is split in two synchronous halves around the
//! network call:
//!
//! 1. [`Conversation::begin_turn`] validates, appends the user entry and
//!    marks the conversation busy, handing back a [`PendingTurn`].
//! 2. [`Conversation::finish_turn`] appends the reply (or error entry) once
//!    the call resolves, unless a reset or teardown happened in between.
//!
//! Nothing in here suspends; [`crate::chat::engine::ConversationEngine`]
//! drives the await between the two halves. A [`PendingTurn`] that is
//! dropped before step 2 frees the guard without touching the transcript.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use secrecy::SecretString;

use chatforge_types::chatbot::ChatbotConfig;
use chatforge_types::error::ChatError;
use chatforge_types::llm::{CompletionSettings, RequestPayload};
use chatforge_types::transcript::{Transcript, TranscriptEntry};

use super::payload::build_request_payload_with;
use super::prompt::build_welcome_message;

/// Outcome of [`Conversation::begin_turn`].
#[derive(Debug)]
pub enum TurnStart {
    /// The turn finished locally without a network call (missing credential).
    /// Carries the bot entry that was appended.
    Resolved(TranscriptEntry),
    /// A completion call must be made and its result handed to
    /// [`Conversation::finish_turn`].
    Pending(PendingTurn),
}

/// Busy marker shared between a conversation and its pending turn.
///
/// Holds `generation + 1` of the turn in flight, or 0 when idle. Only the
/// owning generation can clear it, so a stale turn never frees a newer one.
#[derive(Debug, Clone, Default)]
struct TurnSlot(Arc<AtomicU64>);

impl TurnSlot {
    fn claim(&self, generation: u64) {
        self.0.store(generation.wrapping_add(1), Ordering::Release);
    }

    fn release(&self, generation: u64) {
        let _ = self.0.compare_exchange(
            generation.wrapping_add(1),
            0,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    fn clear(&self) {
        self.0.store(0, Ordering::Release);
    }

    fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire) != 0
    }
}

/// A turn waiting on its completion call.
///
/// Dropping it releases the in-flight guard, so a caller that abandons the
/// future driving the call leaves the conversation ready for the next turn.
#[derive(Debug)]
pub struct PendingTurn {
    pub payload: RequestPayload,
    pub credential: SecretString,
    generation: u64,
    slot: TurnSlot,
}

impl PendingTurn {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for PendingTurn {
    fn drop(&mut self) {
        self.slot.release(self.generation);
    }
}

/// One preview conversation: transcript plus in-flight guard.
#[derive(Debug)]
pub struct Conversation {
    transcript: Transcript,
    settings: CompletionSettings,
    in_flight: TurnSlot,
    generation: u64,
}

impl Conversation {
    /// Start a conversation seeded with the config's welcome message.
    pub fn start(config: &ChatbotConfig) -> Self {
        Self::with_settings(CompletionSettings::default(), config)
    }

    /// Start a conversation whose calls use `settings` instead of the defaults.
    pub fn with_settings(settings: CompletionSettings, config: &ChatbotConfig) -> Self {
        let mut transcript = Transcript::new();
        transcript.reseed(build_welcome_message(config));
        Self {
            transcript,
            settings,
            in_flight: TurnSlot::default(),
            generation: 0,
        }
    }

    /// Reseed the transcript from `config` and invalidate any outstanding call.
    pub fn reset(&mut self, config: &ChatbotConfig) {
        self.transcript.reseed(build_welcome_message(config));
        self.invalidate();
    }

    /// Tear the conversation down. Any outstanding call becomes stale.
    pub fn close(&mut self) {
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight.clear();
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_busy()
    }

    /// Open a turn for `message`.
    ///
    /// Blank messages and submissions made while a call is outstanding are
    /// rejected with nothing appended. Otherwise the user entry is appended
    /// before returning. A blank credential resolves the turn immediately
    /// with a local error entry.
    pub fn begin_turn(
        &mut self,
        config: &ChatbotConfig,
        message: &str,
    ) -> Result<TurnStart, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.in_flight.is_busy() {
            return Err(ChatError::Busy);
        }

        // Built against the transcript as it stands before the user entry.
        let payload = build_request_payload_with(&self.settings, config, &self.transcript, message);
        self.transcript.push_user(message);

        match payload {
            Ok(payload) => {
                self.in_flight.claim(self.generation);
                Ok(TurnStart::Pending(PendingTurn {
                    payload,
                    credential: SecretString::from(config.api_key.clone()),
                    generation: self.generation,
                    slot: self.in_flight.clone(),
                }))
            }
            Err(err) => {
                let entry = self.transcript.push_bot(err.transcript_text());
                Ok(TurnStart::Resolved(entry.clone()))
            }
        }
    }

    /// Close a turn with the result of its completion call.
    ///
    /// Returns the appended bot entry, or `None` when the turn went stale.
    pub fn finish_turn(
        &mut self,
        pending: PendingTurn,
        result: Result<String, ChatError>,
    ) -> Option<&TranscriptEntry> {
        if pending.generation != self.generation {
            return None;
        }
        drop(pending);
        let text = match result {
            Ok(reply) => reply,
            Err(err) => err.transcript_text(),
        };
        Some(self.transcript.push_bot(text))
    }

    /// Drop a turn without touching the transcript.
    pub fn abandon_turn(&mut self, pending: PendingTurn) {
        drop(pending);
    }
}
