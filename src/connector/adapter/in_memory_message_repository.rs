use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::MessageRepository;
use crate::domain::{ChatId, ChatSummary, DomainError, Message};

pub struct InMemoryMessageRepository {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn save(&self, message: &Message) -> Result<(), DomainError> {
        let mut messages = self.messages.lock().await;
        if messages.iter().any(|m| m.id() == message.id()) {
            debug!("Message {} already stored, skipping", message.id());
            return Ok(());
        }
        messages.push(message.clone());
        Ok(())
    }

    async fn find_by_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, DomainError> {
        let messages = self.messages.lock().await;
        let mut found: Vec<Message> = messages
            .iter()
            .filter(|m| m.chat_id() == chat_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        found.sort_by_key(|m| m.timestamp());
        Ok(found)
    }

    async fn list_chats(&self) -> Result<Vec<ChatSummary>, DomainError> {
        let messages = self.messages.lock().await;
        let mut chats: HashMap<&ChatId, (u64, i64)> = HashMap::new();
        for message in messages.iter() {
            let entry = chats.entry(message.chat_id()).or_insert((0, i64::MIN));
            entry.0 += 1;
            entry.1 = entry.1.max(message.timestamp());
        }

        let mut summaries: Vec<ChatSummary> = chats
            .into_iter()
            .map(|(chat_id, (message_count, last_activity))| ChatSummary {
                chat_id: chat_id.clone(),
                message_count,
                last_activity,
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.last_activity
                .cmp(&a.last_activity)
                .then_with(|| a.chat_id.as_str().cmp(b.chat_id.as_str()))
        });
        Ok(summaries)
    }
}
