use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

pub const DEFAULT_CHAT_ID: &str = "default";
pub const WELCOME_MESSAGE_ID: &str = "welcome";
pub const WELCOME_MESSAGE: &str =
    "Hello! I'm OmniGenius, your AI assistant. How can I help you today?";

/// Identifies one conversation in the message log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh, random chat id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ChatId {
    fn default() -> Self {
        Self(DEFAULT_CHAT_ID.to_string())
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            unknown => {
                warn!("Unknown message role '{}', treating as assistant", unknown);
                Role::Assistant
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: String,
    chat_id: ChatId,
    role: Role,
    content: String,
    /// Unix time in milliseconds.
    timestamp: i64,
}

impl Message {
    pub fn new(chat_id: ChatId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            chat_id,
            role,
            content: content.into(),
            timestamp: current_timestamp_millis(),
        }
    }

    pub fn user(chat_id: ChatId, content: impl Into<String>) -> Self {
        Self::new(chat_id, Role::User, content)
    }

    pub fn assistant(chat_id: ChatId, content: impl Into<String>) -> Self {
        Self::new(chat_id, Role::Assistant, content)
    }

    /// The greeting shown at the top of a chat with no recorded messages.
    pub fn welcome(chat_id: ChatId) -> Self {
        Self {
            id: WELCOME_MESSAGE_ID.to_string(),
            chat_id,
            role: Role::Assistant,
            content: WELCOME_MESSAGE.to_string(),
            timestamp: current_timestamp_millis(),
        }
    }

    /// Rebuild a message read back from storage.
    pub fn reconstitute(
        id: String,
        chat_id: ChatId,
        role: Role,
        content: String,
        timestamp: i64,
    ) -> Self {
        Self {
            id,
            chat_id,
            role,
            content,
            timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Per-chat aggregate used when listing conversations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub chat_id: ChatId,
    pub message_count: u64,
    pub last_activity: i64,
}

fn current_timestamp_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
