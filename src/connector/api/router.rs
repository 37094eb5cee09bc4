use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, HistoryController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    history_controller: HistoryController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            history_controller: HistoryController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { prompt } => self.ask_controller.ask(prompt).await,
            Commands::Send { message, chat } => self.chat_controller.send(message, chat).await,
            Commands::Repl { chat } => self.chat_controller.repl(chat).await,
            Commands::NewChat { chat } => self.chat_controller.new_chat(chat).await,
            Commands::History { chat } => self.history_controller.history(chat).await,
            Commands::Chats => self.history_controller.chats().await,
        }
    }
}
