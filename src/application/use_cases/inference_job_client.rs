use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::application::{ChatResponder, InferenceJobApi};
use crate::domain::{DomainError, GenerationParameters, JobId, JobStatus, PollPolicy, Prompt};

/// Submits prompts to a job-based inference API and polls until each job
/// reaches a terminal status or the attempt budget runs out.
///
/// Per job the client moves through
/// `INIT -> SUBMITTED -> {DONE | FAILED | TIMED_OUT}`, or `INIT -> SUBMIT_FAILED`
/// when no job id comes back. Nothing is cached: every call to [`ask`] is a
/// fresh submission.
///
/// [`ask`]: InferenceJobClient::ask
pub struct InferenceJobClient {
    api: Arc<dyn InferenceJobApi>,
    parameters: GenerationParameters,
    policy: PollPolicy,
}

impl InferenceJobClient {
    pub fn new(api: Arc<dyn InferenceJobApi>) -> Self {
        Self {
            api,
            parameters: GenerationParameters::default(),
            policy: PollPolicy::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: GenerationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn parameters(&self) -> &GenerationParameters {
        &self.parameters
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Submit a prompt with the client's generation parameters.
    pub async fn submit(&self, prompt: &Prompt) -> Result<JobId, DomainError> {
        match self.api.submit(prompt, &self.parameters).await {
            Ok(job_id) => {
                info!("Submitted inference job {}", job_id);
                Ok(job_id)
            }
            Err(e) => {
                warn!("Inference job submission failed: {}", e);
                Err(e)
            }
        }
    }

    /// Poll a job with the client's configured policy.
    pub async fn poll_until_done(&self, job_id: &JobId) -> Result<String, DomainError> {
        self.poll_until_done_with(job_id, &self.policy).await
    }

    /// Poll a job until it completes, fails, or `policy.max_attempts()` status
    /// checks have been spent. Each attempt waits first, then checks.
    ///
    /// A network failure during any check ends polling immediately; nothing is
    /// retried here.
    pub async fn poll_until_done_with(
        &self,
        job_id: &JobId,
        policy: &PollPolicy,
    ) -> Result<String, DomainError> {
        for attempt in 1..=policy.max_attempts() {
            tokio::time::sleep(policy.delay_for(attempt, jitter_sample(policy))).await;

            let job = self.api.status(job_id).await.inspect_err(|e| {
                warn!("Status check {} for job {} failed: {}", attempt, job_id, e);
            })?;

            debug!(
                "Job {} status after {} check(s): {}",
                job_id,
                attempt,
                job.status()
            );

            if !job.is_terminal() {
                if let JobStatus::Unknown(raw) = job.status() {
                    debug!("Job {} reported unrecognised status '{}'", job.id(), raw);
                }
                continue;
            }

            if *job.status() == JobStatus::Completed {
                let text = job.output().ok_or_else(|| {
                    DomainError::inference(format!(
                        "job {} completed without a response",
                        job.id()
                    ))
                })?;
                info!("Job {} completed after {} status check(s)", job.id(), attempt);
                return Ok(text.to_string());
            }

            let reason = job.error().unwrap_or(job.status().as_str());
            warn!("Job {} ended remotely: {}", job.id(), reason);
            return Err(DomainError::inference(format!(
                "job {} {}: {}",
                job.id(),
                job.status(),
                reason
            )));
        }

        warn!(
            "Job {} did not finish within {} status checks",
            job_id,
            policy.max_attempts()
        );
        Err(DomainError::timeout(job_id.as_str(), policy.max_attempts()))
    }

    /// Submit, poll, and return the response text.
    pub async fn ask(&self, prompt: &str) -> Result<String, DomainError> {
        let prompt = Prompt::new(prompt)?;
        self.respond(&prompt).await
    }
}

#[async_trait]
impl ChatResponder for InferenceJobClient {
    async fn respond(&self, prompt: &Prompt) -> Result<String, DomainError> {
        let job_id = self.submit(prompt).await?;
        self.poll_until_done(&job_id).await
    }
}

fn jitter_sample(policy: &PollPolicy) -> f64 {
    match policy.backoff() {
        Some(backoff) if backoff.jitter => rand::thread_rng().gen::<f64>(),
        _ => 0.0,
    }
}
