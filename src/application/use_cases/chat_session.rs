use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::{ChatResponder, MessageRepository};
use crate::domain::{ChatId, ChatSummary, DomainError, Message, Prompt};

/// Outcome of sending one message into a chat.
///
/// The user's message is always produced. The reply keeps its structured
/// error so the caller chooses how to present it.
#[derive(Debug)]
pub struct ChatExchange {
    pub user_message: Message,
    pub reply: Result<Message, DomainError>,
}

/// Use case for a conversation: records messages and asks the responder for
/// replies.
pub struct ChatSessionUseCase {
    responder: Arc<dyn ChatResponder>,
    messages: Arc<dyn MessageRepository>,
}

impl ChatSessionUseCase {
    pub fn new(responder: Arc<dyn ChatResponder>, messages: Arc<dyn MessageRepository>) -> Self {
        Self {
            responder,
            messages,
        }
    }

    /// Send `content` into `chat_id`. Blank content is ignored and yields
    /// `None`.
    ///
    /// Storage failures are logged and do not abort the exchange.
    pub async fn send_message(&self, chat_id: &ChatId, content: &str) -> Option<ChatExchange> {
        let prompt = match Prompt::new(content) {
            Ok(prompt) => prompt,
            Err(_) => {
                debug!("Ignoring blank message for chat {}", chat_id);
                return None;
            }
        };

        let user_message = Message::user(chat_id.clone(), prompt.as_str());
        self.record(&user_message).await;

        let reply = match self.responder.respond(&prompt).await {
            Ok(text) => {
                let reply = Message::assistant(chat_id.clone(), text);
                self.record(&reply).await;
                Ok(reply)
            }
            Err(e) => {
                warn!("No reply for chat {}: {}", chat_id, e);
                Err(e)
            }
        };

        Some(ChatExchange {
            user_message,
            reply,
        })
    }

    /// Recorded messages of a chat, or just the welcome message when there are
    /// none yet.
    pub async fn history(&self, chat_id: &ChatId) -> Result<Vec<Message>, DomainError> {
        let messages = self.messages.find_by_chat(chat_id).await?;
        if messages.is_empty() {
            return Ok(vec![Message::welcome(chat_id.clone())]);
        }
        Ok(messages)
    }

    /// Start a new chat if the current one has any recorded messages;
    /// otherwise keep using the current (still empty) chat.
    pub async fn start_new_chat(&self, current: &ChatId) -> Result<ChatId, DomainError> {
        let existing = self.messages.find_by_chat(current).await?;
        if existing.is_empty() {
            debug!("Chat {} is still empty, keeping it", current);
            return Ok(current.clone());
        }

        let next = ChatId::generate();
        info!(
            "Started new chat {} (previous chat {} kept with {} messages)",
            next,
            current,
            existing.len()
        );
        Ok(next)
    }

    pub async fn list_chats(&self) -> Result<Vec<ChatSummary>, DomainError> {
        self.messages.list_chats().await
    }

    async fn record(&self, message: &Message) {
        if let Err(e) = self.messages.save(message).await {
            warn!(
                "Failed to save {} message {}: {}",
                message.role().as_str(),
                message.id(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::InMemoryMessageRepository;
    use crate::domain::{Role, WELCOME_MESSAGE};
    use async_trait::async_trait;

    struct EchoResponder;

    #[async_trait]
    impl ChatResponder for EchoResponder {
        async fn respond(&self, prompt: &Prompt) -> Result<String, DomainError> {
            Ok(format!("you said: {}", prompt))
        }
    }

    struct TimeoutResponder;

    #[async_trait]
    impl ChatResponder for TimeoutResponder {
        async fn respond(&self, _prompt: &Prompt) -> Result<String, DomainError> {
            Err(DomainError::timeout("job-9", 120))
        }
    }

    struct BrokenRepository;

    #[async_trait]
    impl MessageRepository for BrokenRepository {
        async fn save(&self, _message: &Message) -> Result<(), DomainError> {
            Err(DomainError::storage("disk full"))
        }

        async fn find_by_chat(&self, _chat_id: &ChatId) -> Result<Vec<Message>, DomainError> {
            Err(DomainError::storage("disk full"))
        }

        async fn list_chats(&self) -> Result<Vec<ChatSummary>, DomainError> {
            Err(DomainError::storage("disk full"))
        }
    }

    fn new_session(
        responder: Arc<dyn ChatResponder>,
    ) -> (ChatSessionUseCase, Arc<InMemoryMessageRepository>) {
        let repo = Arc::new(InMemoryMessageRepository::new());
        (ChatSessionUseCase::new(responder, repo.clone()), repo)
    }

    #[tokio::test]
    async fn send_records_both_sides_of_the_exchange() {
        let (session, repo) = new_session(Arc::new(EchoResponder));
        let chat = ChatId::default();

        let exchange = session.send_message(&chat, "  hello  ").await.unwrap();
        assert_eq!(exchange.user_message.content(), "hello");
        let reply = exchange.reply.unwrap();
        assert_eq!(reply.content(), "you said: hello");

        let stored = repo.find_by_chat(&chat).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].role(), Role::User);
        assert_eq!(stored[1].role(), Role::Assistant);
    }

    #[tokio::test]
    async fn blank_message_is_ignored() {
        let (session, repo) = new_session(Arc::new(EchoResponder));
        assert!(session.send_message(&ChatId::default(), "   ").await.is_none());
        assert!(repo.list_chats().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_reply_keeps_its_kind_and_is_not_recorded() {
        let (session, repo) = new_session(Arc::new(TimeoutResponder));
        let chat = ChatId::new("c1");

        let exchange = session.send_message(&chat, "slow question").await.unwrap();
        assert!(exchange.reply.unwrap_err().is_timeout());

        let stored = repo.find_by_chat(&chat).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].role(), Role::User);
    }

    #[tokio::test]
    async fn storage_failure_does_not_block_the_reply() {
        let session = ChatSessionUseCase::new(Arc::new(EchoResponder), Arc::new(BrokenRepository));
        let exchange = session
            .send_message(&ChatId::default(), "still works?")
            .await
            .unwrap();
        assert!(exchange.reply.is_ok());
    }

    #[tokio::test]
    async fn empty_history_shows_welcome() {
        let (session, _) = new_session(Arc::new(EchoResponder));
        let history = session.history(&ChatId::new("fresh")).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content(), WELCOME_MESSAGE);
    }

    #[tokio::test]
    async fn new_chat_only_when_current_has_messages() {
        let (session, _) = new_session(Arc::new(EchoResponder));
        let current = ChatId::default();

        let same = session.start_new_chat(&current).await.unwrap();
        assert_eq!(same, current);

        session.send_message(&current, "hi").await.unwrap();
        let next = session.start_new_chat(&current).await.unwrap();
        assert_ne!(next, current);
    }
}
