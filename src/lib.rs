pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatExchange, ChatResponder, ChatSessionUseCase, GuardMode, InferenceJobApi,
    InferenceJobClient, MessageRepository, SingleFlightResponder,
};

pub use cli::{Commands, GuardArg};

pub use connector::{
    DuckdbMessageRepository, HttpInferenceJobApi, InMemoryMessageRepository,
    MockInferenceJobApi, StatusStep, SubmitBehavior,
};

pub use domain::{
    Backoff, ChatId, ChatSummary, DomainError, FailureKind, GenerationParameters, Job, JobId,
    JobStatus, Message, PollPolicy, Prompt, Role, WELCOME_MESSAGE,
};
