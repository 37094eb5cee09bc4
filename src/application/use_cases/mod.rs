mod chat_session;
mod inference_job_client;
mod single_flight;

pub use chat_session::*;
pub use inference_job_client::*;
pub use single_flight::*;
