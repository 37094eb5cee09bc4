use async_trait::async_trait;

use crate::domain::{DomainError, Prompt};

/// Produces a reply for a prompt.
///
/// This is the contract the chat layer depends on. Failures stay structured so
/// the presentation layer decides how to word them and whether to offer a
/// retry.
#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn respond(&self, prompt: &Prompt) -> Result<String, DomainError>;
}
