use anyhow::Result;

use crate::domain::{ChatId, ChatSummary, Message};

use super::super::Container;

pub struct HistoryController<'a> {
    container: &'a Container,
}

impl<'a> HistoryController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn history(&self, chat: Option<String>) -> Result<String> {
        let chat_id = chat.map(ChatId::new).unwrap_or_default();
        let messages = self.container.chat_use_case().history(&chat_id).await?;
        Ok(format_messages(&messages))
    }

    pub async fn chats(&self) -> Result<String> {
        let chats = self.container.chat_use_case().list_chats().await?;
        Ok(self.format_chats(&chats))
    }

    fn format_chats(&self, chats: &[ChatSummary]) -> String {
        if chats.is_empty() {
            return "No chats recorded.".to_string();
        }

        let mut out = String::from("Chats:\n");
        for chat in chats {
            out.push_str(&format!(
                "  {} ({} messages)\n",
                chat.chat_id, chat.message_count
            ));
        }
        if self.container.memory_storage() {
            out.push_str("(in-memory log: chats are lost when the process exits)\n");
        }
        out.trim_end().to_string()
    }
}

pub(crate) fn format_messages(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{:>9}: {}", m.role().as_str(), m.content()))
        .collect::<Vec<_>>()
        .join("\n")
}
