use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque job identifier assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a job as reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    TimedOut,
    Cancelled,
    /// A status string this client does not recognise. Treated as still in
    /// progress.
    Unknown(String),
}

impl JobStatus {
    /// Parse a remote status string. Matching ignores case and accepts both
    /// the plain names and the hosted-queue spellings (`IN_QUEUE`,
    /// `IN_PROGRESS`, ...).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "queued" | "in_queue" | "pending" => JobStatus::Queued,
            "running" | "in_progress" => JobStatus::Running,
            "completed" | "complete" | "succeeded" => JobStatus::Completed,
            "failed" | "error" => JobStatus::Failed,
            "timed_out" => JobStatus::TimedOut,
            "cancelled" | "canceled" => JobStatus::Cancelled,
            _ => JobStatus::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::TimedOut => "timed_out",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Unknown(raw) => raw,
        }
    }

    /// Terminal statuses never change again. Remote `timed_out` and
    /// `cancelled` end the job just like `failed` does.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::TimedOut | JobStatus::Cancelled
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: JobId,
    status: JobStatus,
    output: Option<String>,
    error: Option<String>,
}

impl Job {
    pub fn new(id: JobId, status: JobStatus) -> Self {
        Self {
            id,
            status,
            output: None,
            error: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// Response text. Only meaningful once the job is completed.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_queue_spellings() {
        assert_eq!(JobStatus::parse("queued"), JobStatus::Queued);
        assert_eq!(JobStatus::parse("IN_QUEUE"), JobStatus::Queued);
        assert_eq!(JobStatus::parse("IN_PROGRESS"), JobStatus::Running);
        assert_eq!(JobStatus::parse("Running"), JobStatus::Running);
        assert_eq!(JobStatus::parse("COMPLETED"), JobStatus::Completed);
        assert_eq!(JobStatus::parse("failed"), JobStatus::Failed);
        assert_eq!(JobStatus::parse("TIMED_OUT"), JobStatus::TimedOut);
        assert_eq!(JobStatus::parse("CANCELLED"), JobStatus::Cancelled);
    }

    #[test]
    fn unknown_status_is_not_terminal() {
        let status = JobStatus::parse("WARMING_UP");
        assert_eq!(status, JobStatus::Unknown("WARMING_UP".to_string()));
        assert!(!status.is_terminal());
        assert_eq!(status.as_str(), "WARMING_UP");
    }

    #[test]
    fn only_finished_statuses_are_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::TimedOut.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn job_snapshot_reports_its_status() {
        let job = Job::new(JobId::new("job-7"), JobStatus::Cancelled).with_error("user aborted");
        assert_eq!(job.id().as_str(), "job-7");
        assert!(job.is_terminal());
        assert_eq!(job.error(), Some("user aborted"));
        assert_eq!(job.output(), None);
    }
}
