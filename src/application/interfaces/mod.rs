mod chat_responder;
mod inference_job_api;
mod message_repository;

pub use chat_responder::*;
pub use inference_job_api::*;
pub use message_repository::*;
