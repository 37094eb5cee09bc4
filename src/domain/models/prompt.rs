use std::fmt;

use crate::domain::DomainError;

/// Prompt text sent to the model. Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(text: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_input("prompt is empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let prompt = Prompt::new("  what is rust?\n").unwrap();
        assert_eq!(prompt.as_str(), "what is rust?");
    }

    #[test]
    fn rejects_blank_text() {
        assert!(Prompt::new("").is_err());
        assert!(Prompt::new(" \t\n ").is_err());
    }
}
