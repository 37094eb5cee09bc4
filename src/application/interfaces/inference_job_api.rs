use async_trait::async_trait;

use crate::domain::{DomainError, GenerationParameters, Job, JobId, Prompt};

/// A remote inference service that separates "submit" from "fetch result".
///
/// Implementors own transport, authentication and wire format. Errors are
/// classified as submission failures (no usable job id) or network failures
/// (transport or malformed responses); job-level failures are reported through
/// the returned [`Job`]'s status instead.
#[async_trait]
pub trait InferenceJobApi: Send + Sync {
    /// Submit a prompt and return the id the service assigned to the job.
    async fn submit(
        &self,
        prompt: &Prompt,
        parameters: &GenerationParameters,
    ) -> Result<JobId, DomainError>;

    /// Read the current status of a job.
    async fn status(&self, job_id: &JobId) -> Result<Job, DomainError>;
}
