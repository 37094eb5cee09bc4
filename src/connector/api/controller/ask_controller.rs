use anyhow::Result;

use crate::connector::api::presenter::render_failure;
use crate::domain::Prompt;

use super::super::Container;

/// One-off questions that are not recorded in any chat.
pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn ask(&self, prompt: String) -> Result<String> {
        let prompt = Prompt::new(&prompt)?;

        match self.container.responder().respond(&prompt).await {
            Ok(text) => Ok(text),
            Err(e) => Ok(render_failure(&e)),
        }
    }
}
