use clap::{Subcommand, ValueEnum};

use crate::application::GuardMode;

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-off question; nothing is recorded
    Ask { prompt: String },

    /// Send a message into a chat and print the reply
    Send {
        message: String,

        #[arg(short, long)]
        chat: Option<String>,
    },

    /// Chat interactively on stdin
    Repl {
        #[arg(short, long)]
        chat: Option<String>,
    },

    /// Print the messages of a chat
    History {
        #[arg(short, long)]
        chat: Option<String>,
    },

    /// List recorded chats
    Chats,

    /// Start a new chat if the current one has messages
    NewChat {
        #[arg(short, long)]
        chat: Option<String>,
    },
}

/// What to do with a request sent while another is still being answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GuardArg {
    Off,
    Reject,
    Queue,
}

impl GuardArg {
    pub fn mode(self) -> Option<GuardMode> {
        match self {
            GuardArg::Off => None,
            GuardArg::Reject => Some(GuardMode::Reject),
            GuardArg::Queue => Some(GuardMode::Queue),
        }
    }
}
