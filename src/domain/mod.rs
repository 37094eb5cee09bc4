//! # Domain Layer
//!
//! Jobs, prompts, chat messages and the error type shared by every layer.
//! Nothing here knows about HTTP or storage.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
