use thiserror::Error;

/// Coarse classification of a [`DomainError`].
///
/// The first four variants are the failure kinds of an inference job. The
/// presentation layer picks display text from the kind, so tests can assert on
/// kinds without depending on wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Submission,
    Inference,
    Timeout,
    Network,
    InvalidInput,
    Busy,
    Storage,
    Configuration,
    Internal,
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// The job API accepted the connection but did not hand back a job id.
    /// Carries the raw response body for diagnostics.
    #[error("Submission error: no usable job id in response: {body}")]
    SubmissionError { body: String },

    /// The remote service reported the job as failed.
    #[error("Inference error: {0}")]
    InferenceError(String),

    /// No terminal status was observed within the attempt budget. The job may
    /// still be running remotely.
    #[error("Timeout: job {job_id} not finished after {attempts} status checks")]
    TimeoutError { job_id: String, attempts: u32 },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn submission(body: impl Into<String>) -> Self {
        Self::SubmissionError { body: body.into() }
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::InferenceError(msg.into())
    }

    pub fn timeout(job_id: impl Into<String>, attempts: u32) -> Self {
        Self::TimeoutError {
            job_id: job_id.into(),
            attempts,
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SubmissionError { .. } => FailureKind::Submission,
            Self::InferenceError(_) => FailureKind::Inference,
            Self::TimeoutError { .. } => FailureKind::Timeout,
            Self::NetworkError(_) => FailureKind::Network,
            Self::InvalidInput(_) => FailureKind::InvalidInput,
            Self::Busy(_) => FailureKind::Busy,
            Self::StorageError(_) | Self::IoError(_) => FailureKind::Storage,
            Self::Configuration(_) => FailureKind::Configuration,
            Self::Internal(_) => FailureKind::Internal,
        }
    }

    /// Whether asking again could plausibly succeed. Nothing in the crate
    /// retries on its own; callers use this to decide whether to offer a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            FailureKind::Network | FailureKind::Timeout | FailureKind::Busy
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimeoutError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(DomainError::submission("{}").kind(), FailureKind::Submission);
        assert_eq!(DomainError::inference("boom").kind(), FailureKind::Inference);
        assert_eq!(DomainError::timeout("job-1", 120).kind(), FailureKind::Timeout);
        assert_eq!(DomainError::network("refused").kind(), FailureKind::Network);
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(DomainError::network("reset").is_retryable());
        assert!(DomainError::timeout("job-1", 3).is_retryable());
        assert!(!DomainError::submission("").is_retryable());
        assert!(!DomainError::inference("oom").is_retryable());
        assert!(!DomainError::invalid_input("empty").is_retryable());
    }

    #[test]
    fn timeout_message_names_job_and_attempts() {
        let err = DomainError::timeout("abc", 120);
        assert_eq!(
            err.to_string(),
            "Timeout: job abc not finished after 120 status checks"
        );
    }
}
