use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::{ChatExchange, ChatSessionUseCase};
use crate::connector::api::presenter::render_failure;
use crate::domain::ChatId;

use super::super::Container;
use super::history_controller::format_messages;

const REPL_HELP: &str = "Commands: /new starts a new chat, /history shows this chat, /quit exits.";

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn send(&self, message: String, chat: Option<String>) -> Result<String> {
        let chat_id = chat.map(ChatId::new).unwrap_or_default();
        let use_case = self.container.chat_use_case();

        match use_case.send_message(&chat_id, &message).await {
            Some(exchange) => Ok(self.format_reply(&exchange)),
            None => Ok("Nothing to send.".to_string()),
        }
    }

    pub async fn new_chat(&self, chat: Option<String>) -> Result<String> {
        let current = chat.map(ChatId::new).unwrap_or_default();
        let next = self.container.chat_use_case().start_new_chat(&current).await?;

        if next == current {
            Ok(format!("Chat {} is still empty; keep using it.", current))
        } else {
            Ok(format!("New chat started: {}", next))
        }
    }

    /// Interactive loop over stdin. Each line is sent and answered before the
    /// next one is read.
    pub async fn repl(&self, chat: Option<String>) -> Result<String> {
        let use_case = self.container.chat_use_case();
        let mut chat_id = chat.map(ChatId::new).unwrap_or_default();

        println!("{}", format_messages(&use_case.history(&chat_id).await?));
        println!("{}", REPL_HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match line.trim() {
                "/quit" | "/exit" => break,
                "/history" => println!("{}", format_messages(&use_case.history(&chat_id).await?)),
                "/new" => {
                    chat_id = self.switch_chat(&use_case, &chat_id).await?;
                }
                _ => {
                    if let Some(exchange) = use_case.send_message(&chat_id, &line).await {
                        println!("{}", self.format_reply(&exchange));
                    }
                }
            }
        }

        Ok(format!("Goodbye. Your chat id is {}", chat_id))
    }

    async fn switch_chat(&self, use_case: &ChatSessionUseCase, current: &ChatId) -> Result<ChatId> {
        let next = use_case.start_new_chat(current).await?;
        if &next != current {
            println!("New chat started ({}); previous chat has been saved.", next);
            println!("{}", format_messages(&use_case.history(&next).await?));
        }
        Ok(next)
    }

    fn format_reply(&self, exchange: &ChatExchange) -> String {
        match &exchange.reply {
            Ok(reply) => reply.content().to_string(),
            Err(e) => render_failure(e),
        }
    }
}
