use async_trait::async_trait;

use crate::domain::{ChatId, ChatSummary, DomainError, Message};

/// Append-only log of chat messages.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn save(&self, message: &Message) -> Result<(), DomainError>;

    /// Messages of one chat ordered by timestamp; equal timestamps keep
    /// insertion order.
    async fn find_by_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, DomainError>;

    /// All chats with at least one message, most recently active first.
    async fn list_chats(&self) -> Result<Vec<ChatSummary>, DomainError>;
}
