//! # Application Layer
//!
//! Ports to the outside world and the use cases built on them: the inference
//! job client, its single-flight guard and the chat session.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
