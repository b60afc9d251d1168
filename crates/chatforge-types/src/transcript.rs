//! Conversation transcript types.
//!
//! A transcript is the ordered, append-only list of what the user and the
//! bot said during one preview session.

use serde::{Deserialize, Serialize};

use std::fmt;

use crate::llm::MessageRole;

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Role of this sender in a chat-completion message list.
    pub fn role(&self) -> MessageRole {
        match self {
            Sender::User => MessageRole::User,
            Sender::Bot => MessageRole::Assistant,
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// A single line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub sender: Sender,
    pub text: String,
}

impl TranscriptEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Ordered, append-only conversation history.
///
/// Entries are never edited or removed one by one; the only way to shrink
/// a transcript is [`Transcript::reseed`], which starts a fresh preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the transcript and start it with a single bot welcome entry.
    pub fn reseed(&mut self, welcome: impl Into<String>) {
        self.entries.clear();
        self.entries.push(TranscriptEntry::bot(welcome));
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &TranscriptEntry {
        self.push(TranscriptEntry::user(text))
    }

    pub fn push_bot(&mut self, text: impl Into<String>) -> &TranscriptEntry {
        self.push(TranscriptEntry::bot(text))
    }

    fn push(&mut self, entry: TranscriptEntry) -> &TranscriptEntry {
        self.entries.push(entry);
        // Just pushed, so the vector is non-empty.
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
