use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::application::InferenceJobApi;
use crate::domain::{DomainError, GenerationParameters, Job, JobId, JobStatus, Prompt};

/// Replies used by the offline backend.
const CANNED_RESPONSES: &[&str] = &[
    "I understand your question. Based on my analysis, there are several approaches we could take to solve this problem.",
    "That's an interesting topic. There are multiple perspectives to consider here, and I'd be happy to explore them with you.",
    "Thanks for sharing that. I can provide some insights based on the available information, though I recommend consulting with a specialist for definitive advice.",
    "I've processed your request and here's what I found. Let me know if you'd like me to elaborate on any specific aspect.",
    "Great question! This is a complex topic with various nuances. Let me break it down for you in a comprehensive way.",
];

/// How the mock answers a submission.
#[derive(Debug, Clone)]
pub enum SubmitBehavior {
    /// Assign a fresh job id.
    Accept,
    /// Answer, but with a body that carries no job id.
    MissingId(String),
    /// Fail at the transport level.
    NetworkFailure(String),
}

/// One scripted answer to a status check.
#[derive(Debug, Clone)]
pub enum StatusStep {
    Status(JobStatus),
    Completed(String),
    Failed(String),
    /// Complete with one of the canned replies, picked at random.
    CannedReply,
    NetworkFailure(String),
}

/// In-process [`InferenceJobApi`] driven by a status script.
///
/// Every submitted job walks the same script independently; once a job runs
/// past the end of the script the last step repeats. Submissions and status
/// checks are recorded for assertions.
pub struct MockInferenceJobApi {
    submit_behavior: SubmitBehavior,
    script: Vec<StatusStep>,
    next_id: AtomicU64,
    progress: Mutex<HashMap<JobId, usize>>,
    submissions: Mutex<Vec<(String, GenerationParameters)>>,
    status_calls: Mutex<Vec<(JobId, Instant)>>,
}

impl MockInferenceJobApi {
    pub fn new(script: Vec<StatusStep>) -> Self {
        Self {
            submit_behavior: SubmitBehavior::Accept,
            script,
            next_id: AtomicU64::new(1),
            progress: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
        }
    }

    /// Offline backend: each job reports `running` once, then completes with
    /// a canned reply.
    pub fn canned() -> Self {
        Self::new(vec![
            StatusStep::Status(JobStatus::Running),
            StatusStep::CannedReply,
        ])
    }

    /// Every job reports `statuses` in order and then completes with `text`.
    pub fn completing_after(statuses: Vec<JobStatus>, text: impl Into<String>) -> Self {
        let mut script: Vec<StatusStep> = statuses.into_iter().map(StatusStep::Status).collect();
        script.push(StatusStep::Completed(text.into()));
        Self::new(script)
    }

    pub fn with_submit_behavior(mut self, behavior: SubmitBehavior) -> Self {
        self.submit_behavior = behavior;
        self
    }

    /// Prompts submitted so far, in order.
    pub async fn submitted_prompts(&self) -> Vec<String> {
        self.submissions
            .lock()
            .await
            .iter()
            .map(|(prompt, _)| prompt.clone())
            .collect()
    }

    pub async fn last_parameters(&self) -> Option<GenerationParameters> {
        self.submissions.lock().await.last().map(|(_, p)| *p)
    }

    pub async fn status_call_count(&self) -> usize {
        self.status_calls.lock().await.len()
    }

    /// When each status check happened, on tokio's clock.
    pub async fn status_call_times(&self) -> Vec<Instant> {
        self.status_calls.lock().await.iter().map(|(_, at)| *at).collect()
    }
}

impl Default for MockInferenceJobApi {
    fn default() -> Self {
        Self::canned()
    }
}

#[async_trait]
impl InferenceJobApi for MockInferenceJobApi {
    async fn submit(
        &self,
        prompt: &Prompt,
        parameters: &GenerationParameters,
    ) -> Result<JobId, DomainError> {
        self.submissions
            .lock()
            .await
            .push((prompt.as_str().to_string(), *parameters));

        match &self.submit_behavior {
            SubmitBehavior::Accept => {
                let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                let job_id = JobId::new(format!("mock-job-{n}"));
                debug!("MockInferenceJobApi: accepted {}", job_id);
                Ok(job_id)
            }
            SubmitBehavior::MissingId(body) => Err(DomainError::submission(body.clone())),
            SubmitBehavior::NetworkFailure(msg) => Err(DomainError::network(msg.clone())),
        }
    }

    async fn status(&self, job_id: &JobId) -> Result<Job, DomainError> {
        self.status_calls
            .lock()
            .await
            .push((job_id.clone(), Instant::now()));

        let step = {
            let mut progress = self.progress.lock().await;
            let index = progress.entry(job_id.clone()).or_insert(0);
            let step = self
                .script
                .get(*index)
                .or_else(|| self.script.last())
                .cloned()
                .unwrap_or(StatusStep::Status(JobStatus::Running));
            *index += 1;
            step
        };

        match step {
            StatusStep::Status(status) => Ok(Job::new(job_id.clone(), status)),
            StatusStep::Completed(text) => {
                Ok(Job::new(job_id.clone(), JobStatus::Completed).with_output(text))
            }
            StatusStep::Failed(reason) => {
                Ok(Job::new(job_id.clone(), JobStatus::Failed).with_error(reason))
            }
            StatusStep::CannedReply => {
                let text = pick_canned_response();
                Ok(Job::new(job_id.clone(), JobStatus::Completed).with_output(text))
            }
            StatusStep::NetworkFailure(msg) => Err(DomainError::network(msg)),
        }
    }
}

fn pick_canned_response() -> &'static str {
    CANNED_RESPONSES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(CANNED_RESPONSES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn each_job_walks_the_script_independently() {
        let api = MockInferenceJobApi::completing_after(vec![JobStatus::Queued], "done");
        let prompt = Prompt::new("x").unwrap();
        let params = GenerationParameters::default();

        let a = api.submit(&prompt, &params).await.unwrap();
        let b = api.submit(&prompt, &params).await.unwrap();
        assert_ne!(a, b);

        assert_eq!(api.status(&a).await.unwrap().status(), &JobStatus::Queued);
        assert_eq!(api.status(&b).await.unwrap().status(), &JobStatus::Queued);
        assert_eq!(api.status(&a).await.unwrap().output(), Some("done"));
        // Past the end the last step repeats.
        assert_eq!(api.status(&a).await.unwrap().output(), Some("done"));
        assert_eq!(api.status_call_count().await, 4);
    }

    #[tokio::test]
    async fn canned_backend_completes_with_a_known_reply() {
        let api = MockInferenceJobApi::canned();
        let job_id = api
            .submit(&Prompt::new("hi").unwrap(), &GenerationParameters::default())
            .await
            .unwrap();

        assert_eq!(api.status(&job_id).await.unwrap().status(), &JobStatus::Running);
        let done = api.status(&job_id).await.unwrap();
        assert!(CANNED_RESPONSES.contains(&done.output().unwrap()));
    }
}
