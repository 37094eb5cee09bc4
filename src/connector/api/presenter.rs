//! Turns structured failures into the text shown to a person.
//!
//! This is the only place that chooses wording; everything below it passes
//! [`DomainError`] through untouched.

use crate::domain::{DomainError, FailureKind};

pub const SUBMISSION_FAILED_MESSAGE: &str =
    "Sorry, I couldn't submit your request to the model. Please try again.";
pub const INFERENCE_FAILED_MESSAGE: &str =
    "Sorry, the model crashed while processing your request.";
pub const TIMEOUT_MESSAGE: &str =
    "Sorry, the model is taking too long to respond. It may still be working on your request.";
pub const NETWORK_FAILED_MESSAGE: &str =
    "Sorry, I couldn't reach the model service. Please check your connection.";
pub const BUSY_MESSAGE: &str = "Please wait for the current reply before sending another message.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Sorry, something went wrong.";

pub fn display_message(error: &DomainError) -> &'static str {
    match error.kind() {
        FailureKind::Submission => SUBMISSION_FAILED_MESSAGE,
        FailureKind::Inference => INFERENCE_FAILED_MESSAGE,
        FailureKind::Timeout => TIMEOUT_MESSAGE,
        FailureKind::Network => NETWORK_FAILED_MESSAGE,
        FailureKind::Busy => BUSY_MESSAGE,
        FailureKind::InvalidInput
        | FailureKind::Storage
        | FailureKind::Configuration
        | FailureKind::Internal => GENERIC_FAILURE_MESSAGE,
    }
}

/// Display text plus a retry hint for failures worth retrying.
pub fn render_failure(error: &DomainError) -> String {
    if error.is_retryable() {
        format!("{} (you can retry)", display_message(error))
    } else {
        display_message(error).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_inference_failure_kind_has_its_own_message() {
        let messages = [
            display_message(&DomainError::submission("{}")),
            display_message(&DomainError::inference("crash")),
            display_message(&DomainError::timeout("j", 120)),
            display_message(&DomainError::network("refused")),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn retry_hint_only_for_retryable_failures() {
        assert!(render_failure(&DomainError::network("x")).ends_with("(you can retry)"));
        assert_eq!(
            render_failure(&DomainError::inference("x")),
            INFERENCE_FAILED_MESSAGE
        );
    }
}
