use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::application::ChatResponder;
use crate::domain::{DomainError, Prompt};

/// What to do with a request that arrives while another one is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardMode {
    /// Fail immediately with [`DomainError::Busy`].
    Reject,
    /// Wait for the in-flight request to finish, then run.
    Queue,
}

/// Allows at most one outstanding request through to the wrapped responder.
pub struct SingleFlightResponder {
    inner: Arc<dyn ChatResponder>,
    slot: Semaphore,
    mode: GuardMode,
}

impl SingleFlightResponder {
    pub fn new(inner: Arc<dyn ChatResponder>, mode: GuardMode) -> Self {
        Self {
            inner,
            slot: Semaphore::new(1),
            mode,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.slot.available_permits() == 1
    }
}

#[async_trait]
impl ChatResponder for SingleFlightResponder {
    async fn respond(&self, prompt: &Prompt) -> Result<String, DomainError> {
        let _permit = match self.mode {
            GuardMode::Reject => self
                .slot
                .try_acquire()
                .map_err(|_| DomainError::busy("a request is already in flight"))?,
            GuardMode::Queue => {
                if !self.is_idle() {
                    debug!("Request queued behind an in-flight request");
                }
                self.slot
                    .acquire()
                    .await
                    .map_err(|e| DomainError::internal(format!("in-flight guard closed: {e}")))?
            }
        };

        self.inner.respond(prompt).await
    }
}
