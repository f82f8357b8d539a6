//! Chat turn types shared by the HTTP surface and the chat service.
//!
//! A conversation is carried entirely by the caller: each request sends the
//! full history, each response returns it with the new turns appended. The
//! server keeps nothing between requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender as understood by the completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Priming instructions from configuration
    System,
    /// The end user
    User,
    /// The model's reply
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single turn in a conversation.
///
/// `role` is a free-form string on the wire: callers may send roles this
/// service does not recognize, and those turns survive a round-trip
/// untouched. Only the assembler decides which roles reach the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this turn ("user", "assistant", ...)
    pub role: String,

    /// The text content
    pub content: String,

    /// When the turn was created
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user turn stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User.as_str().to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant turn stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant.as_str().to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// An inbound chat request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The new user message. Must be non-empty.
    #[serde(default)]
    pub message: String,

    /// Prior turns, oldest first. Absent means a fresh conversation.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// The reply to a chat request.
///
/// `history` includes the newly appended user and assistant turns; the
/// caller resends it unchanged on the next call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    pub history: Vec<ChatMessage>,
}
