//! Client-side conversation transcript
//!
//! The server keeps no conversation state. A client holds the running
//! transcript for as long as it is open and sends the earlier turns along
//! with each new utterance.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Who spoke a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    /// Role name used in `conversationHistory` on the wire
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "assistant",
        }
    }
}

/// One turn in the transcript
#[derive(Debug, Clone)]
pub struct TranscriptMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A history entry as sent to the assistant endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Linear, in-memory conversation for a single session
#[derive(Debug, Clone)]
pub struct Transcript {
    session_id: String,
    messages: Vec<TranscriptMessage>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    /// Start an empty transcript with a fresh session id
    #[must_use]
    pub fn new() -> Self {
        Self::with_session_id(generate_session_id())
    }

    /// Start an empty transcript under an existing session id
    #[must_use]
    pub const fn with_session_id(session_id: String) -> Self {
        Self {
            session_id,
            messages: Vec::new(),
        }
    }

    /// Session identifier used to tag log rows
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// All turns so far, oldest first
    #[must_use]
    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    /// Append a guest turn
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content.into());
    }

    /// Append a concierge turn
    pub fn push_bot(&mut self, content: impl Into<String>) {
        self.push(Role::Bot, content.into());
    }

    fn push(&mut self, role: Role, content: String) {
        self.messages.push(TranscriptMessage {
            role,
            content,
            timestamp: Utc::now(),
        });
    }

    /// Turns formatted for `conversationHistory`
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .map(|m| HistoryEntry {
                role: m.role.wire_name().to_string(),
                content: m.content.clone(),
            })
            .collect()
    }
}

/// Generate a session id of the form `session-<unix millis>-<base36>`
#[must_use]
pub fn generate_session_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect();

    format!("session-{}-{suffix}", Utc::now().timestamp_millis())
}
