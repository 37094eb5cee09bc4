mod generation;
mod job;
mod message;
mod poll_policy;
mod prompt;

pub use generation::*;
pub use job::*;
pub use message::*;
pub use poll_policy::*;
pub use prompt::*;
