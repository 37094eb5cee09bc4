mod duckdb_message_repository;
mod http_job_api;
mod in_memory_message_repository;
mod mock_job_api;

pub use duckdb_message_repository::*;
pub use http_job_api::*;
pub use in_memory_message_repository::*;
pub use mock_job_api::*;
