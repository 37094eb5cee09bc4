use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::InferenceJobApi;
use crate::domain::{DomainError, GenerationParameters, Job, JobId, JobStatus, Prompt};

pub const ENDPOINT_ENV: &str = "OMNIGENIUS_ENDPOINT";
pub const API_KEY_ENV: &str = "OMNIGENIUS_API_KEY";
const RUN_PATH: &str = "run";
const STATUS_PATH: &str = "status";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `POST {endpoint}/run` payload.
#[derive(Serialize)]
struct RunRequest<'a> {
    input: RunInput<'a>,
}

#[derive(Serialize)]
struct RunInput<'a> {
    prompt: &'a str,
    max_tokens: u32,
    alpha: f32,
    recurrence: u32,
}

/// HTTP client for a hosted job-queue inference endpoint.
///
/// Submits with `POST {endpoint}/run` and reads status with
/// `GET {endpoint}/status/{id}`, both authenticated with a bearer token.
///
/// The credential only ever comes from the caller or the environment:
///
/// ```text
/// OMNIGENIUS_ENDPOINT=https://api.example.com/v2/my-endpoint
/// OMNIGENIUS_API_KEY=...
/// ```
pub struct HttpInferenceJobApi {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
    run_url: Url,
}

impl HttpInferenceJobApi {
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<Self, DomainError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DomainError::configuration("API key is empty"));
        }

        let base_url = Url::parse(endpoint.trim()).map_err(|e| {
            DomainError::configuration(format!("invalid endpoint URL '{}': {}", endpoint, e))
        })?;
        let run_url = join_segments(&base_url, &[RUN_PATH])?;

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            base_url,
            run_url,
        })
    }

    /// Construct from `OMNIGENIUS_ENDPOINT` and `OMNIGENIUS_API_KEY`.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_env_with_endpoint(None)
    }

    /// Like [`from_env`](Self::from_env), but an explicit endpoint wins over
    /// `OMNIGENIUS_ENDPOINT`. The key is always read from the environment.
    pub fn from_env_with_endpoint(endpoint: Option<String>) -> Result<Self, DomainError> {
        let endpoint = endpoint
            .or_else(|| std::env::var(ENDPOINT_ENV).ok())
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| DomainError::configuration(format!("{} is not set", ENDPOINT_ENV)))?;
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| DomainError::configuration(format!("{} is not set", API_KEY_ENV)))?;
        Self::new(&endpoint, api_key)
    }

    pub fn endpoint(&self) -> &Url {
        &self.base_url
    }

    fn status_url(&self, job_id: &JobId) -> Result<Url, DomainError> {
        join_segments(&self.base_url, &[STATUS_PATH, job_id.as_str()])
    }

    /// Pull the job id out of a submit response body.
    fn parse_job_id(body: &str) -> Option<JobId> {
        let value: Value = serde_json::from_str(body).ok()?;
        let id = match value.get("id")? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!id.is_empty()).then(|| JobId::new(id))
    }

    /// Decode a status response body into a [`Job`].
    fn parse_status(job_id: &JobId, body: &str) -> Result<Job, DomainError> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            DomainError::network(format!("malformed status response for job {}: {}", job_id, e))
        })?;

        let status = value
            .get("status")
            .and_then(Value::as_str)
            .map(JobStatus::parse)
            .ok_or_else(|| {
                DomainError::network(format!("status response for job {} has no status", job_id))
            })?;

        let mut job = Job::new(job_id.clone(), status);

        if let Some(text) = value
            .get("output")
            .and_then(|o| o.get("response"))
            .and_then(Value::as_str)
        {
            job = job.with_output(text);
        }

        match value.get("error") {
            Some(Value::String(s)) if !s.is_empty() => job = job.with_error(s.as_str()),
            Some(Value::Null) | None => {}
            Some(Value::String(_)) => {}
            Some(other) => job = job.with_error(other.to_string()),
        }

        Ok(job)
    }
}

#[async_trait]
impl InferenceJobApi for HttpInferenceJobApi {
    async fn submit(
        &self,
        prompt: &Prompt,
        parameters: &GenerationParameters,
    ) -> Result<JobId, DomainError> {
        let request = RunRequest {
            input: RunInput {
                prompt: prompt.as_str(),
                max_tokens: parameters.max_tokens,
                alpha: parameters.sampling_bias,
                recurrence: parameters.recurrence_steps,
            },
        };

        let response = self
            .client
            .post(self.run_url.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::network(format!("submit request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::network(format!("failed to read submit response: {e}")))?;

        if !status.is_success() {
            warn!("HttpInferenceJobApi: run endpoint returned {status}: {body}");
            return Err(DomainError::submission(body));
        }

        match Self::parse_job_id(&body) {
            Some(job_id) => {
                debug!("HttpInferenceJobApi: job {} accepted", job_id);
                Ok(job_id)
            }
            None => {
                warn!("HttpInferenceJobApi: no job id in submit response: {body}");
                Err(DomainError::submission(body))
            }
        }
    }

    async fn status(&self, job_id: &JobId) -> Result<Job, DomainError> {
        let url = self.status_url(job_id)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| DomainError::network(format!("status request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DomainError::network(format!("failed to read status response: {e}")))?;

        if !status.is_success() {
            warn!(
                "HttpInferenceJobApi: status endpoint returned {} for job {}: {}",
                status, job_id, body
            );
            return Err(DomainError::network(format!("status endpoint returned {status}")));
        }

        Self::parse_status(job_id, &body)
    }
}

/// Append path segments to `base`, percent-encoding each one.
fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, DomainError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            DomainError::configuration(format!("endpoint '{}' cannot be a base URL", base))
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
