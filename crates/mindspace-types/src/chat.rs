//! Conversation turn types for the MindSpace dashboard.
//!
//! Turns live only in memory for the lifetime of one dashboard view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Text of the assistant turn appended when the completion service fails.
pub const COMPLETION_ERROR_TEXT: &str = "Error fetching response.";

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "assistant" | "ai" => Ok(Sender::Assistant),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// Unique identifier of a turn (UUID v7, time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnId(pub Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub text: String,
    pub sender: Sender,
    /// For assistant turns, the user turn this replies to.
    pub reply_to: Option<TurnId>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// A turn authored by the signed-in user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            text: text.into(),
            sender: Sender::User,
            reply_to: None,
            created_at: Utc::now(),
        }
    }

    /// An assistant reply to the user turn `reply_to`.
    pub fn assistant(text: impl Into<String>, reply_to: TurnId) -> Self {
        Self {
            id: TurnId::new(),
            text: text.into(),
            sender: Sender::Assistant,
            reply_to: Some(reply_to),
            created_at: Utc::now(),
        }
    }

    /// Whether this assistant turn is the fixed completion error text.
    pub fn is_error(&self) -> bool {
        self.sender == Sender::Assistant && self.text == COMPLETION_ERROR_TEXT
    }
}
