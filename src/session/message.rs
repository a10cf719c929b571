//! Transcript message types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the user
    User,
    /// Produced by the assistant (including synthesized error replies)
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of a session transcript
///
/// Created once at send or receive time and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier within the session (a ULID, so ids sort by creation time)
    pub id: String,
    /// Author of the message
    pub role: Role,
    /// Text content
    pub content: String,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Reasoning trace returned alongside an assistant reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
}

impl Message {
    /// Creates a user message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use maguai::session::{Message, Role};
    ///
    /// let msg = Message::user("Hello");
    /// assert_eq!(msg.role, Role::User);
    /// assert_eq!(msg.content, "Hello");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), None)
    }

    /// Creates an assistant message stamped with the current time
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), None)
    }

    /// Creates an assistant message carrying a reasoning trace
    pub fn assistant_with_thinking(content: impl Into<String>, thinking: Option<String>) -> Self {
        Self::new(Role::Assistant, content.into(), thinking)
    }

    fn new(role: Role, content: String, thinking: Option<String>) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            role,
            content,
            timestamp: chrono::Utc::now().timestamp_millis(),
            thinking,
        }
    }

    /// Local wall-clock time of the message as `HH:MM`
    pub fn time_label(&self) -> String {
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.timestamp)
            .map(|t| t.with_timezone(&chrono::Local).format("%H:%M").to_string())
            .unwrap_or_default()
    }
}
