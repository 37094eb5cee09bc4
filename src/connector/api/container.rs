use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    ChatResponder, ChatSessionUseCase, GuardMode, InferenceJobApi, InferenceJobClient,
    MessageRepository, SingleFlightResponder,
};
use crate::connector::{
    DuckdbMessageRepository, HttpInferenceJobApi, InMemoryMessageRepository, MockInferenceJobApi,
};
use crate::domain::{GenerationParameters, PollPolicy};

pub struct ContainerConfig {
    pub data_dir: String,
    /// Keep the message log in memory instead of `<data_dir>/omnigenius.duckdb`.
    pub memory_storage: bool,
    /// Answer from the built-in canned backend instead of the remote service.
    pub mock_inference: bool,
    /// Overrides `OMNIGENIUS_ENDPOINT` when set.
    pub endpoint: Option<String>,
    pub parameters: GenerationParameters,
    pub poll_policy: PollPolicy,
    /// `None` lets concurrent requests through unguarded.
    pub guard: Option<GuardMode>,
}

pub struct Container {
    job_client: Arc<InferenceJobClient>,
    responder: Arc<dyn ChatResponder>,
    message_repo: Arc<dyn MessageRepository>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let api: Arc<dyn InferenceJobApi> = if config.mock_inference {
            debug!("Using canned mock inference backend");
            Arc::new(MockInferenceJobApi::canned())
        } else {
            let http = HttpInferenceJobApi::from_env_with_endpoint(config.endpoint.clone())?;
            debug!("Using inference endpoint {}", http.endpoint());
            Arc::new(http)
        };

        Self::with_job_api(config, api)
    }

    /// Build the container around an already constructed job API.
    pub fn with_job_api(config: ContainerConfig, api: Arc<dyn InferenceJobApi>) -> Result<Self> {
        let job_client = Arc::new(
            InferenceJobClient::new(api)
                .with_parameters(config.parameters)
                .with_poll_policy(config.poll_policy),
        );

        let responder: Arc<dyn ChatResponder> = match config.guard {
            Some(mode) => {
                debug!("Guarding inference requests with single-flight mode {:?}", mode);
                Arc::new(SingleFlightResponder::new(job_client.clone(), mode))
            }
            None => job_client.clone(),
        };

        let message_repo: Arc<dyn MessageRepository> = if config.memory_storage {
            debug!("Using in-memory message log");
            Arc::new(InMemoryMessageRepository::new())
        } else {
            let db_path = PathBuf::from(&config.data_dir).join("omnigenius.duckdb");
            match DuckdbMessageRepository::new(&db_path) {
                Ok(repo) => {
                    debug!("Using DuckDB message log at {:?}", db_path);
                    Arc::new(repo)
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to open DuckDB ({}): {}. Falling back to in-memory message log.",
                        db_path.display(),
                        e
                    );
                    Arc::new(InMemoryMessageRepository::new())
                }
            }
        };

        Ok(Self {
            job_client,
            responder,
            message_repo,
            config,
        })
    }

    pub fn job_client(&self) -> Arc<InferenceJobClient> {
        self.job_client.clone()
    }

    /// The responder chat flows should use; guarded when configured.
    pub fn responder(&self) -> Arc<dyn ChatResponder> {
        self.responder.clone()
    }

    pub fn chat_use_case(&self) -> ChatSessionUseCase {
        ChatSessionUseCase::new(self.responder.clone(), self.message_repo.clone())
    }

    pub fn memory_storage(&self) -> bool {
        self.config.memory_storage
    }
}
