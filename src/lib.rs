pub mod cli;
pub mod cli_handlers;
pub mod config;
pub mod error;
pub mod format;
pub mod intent;
pub mod llm;
pub mod models;
pub mod respond;
pub mod session;
pub mod store;
pub mod todo;

pub use error::{AppError, LlmError, Result, TodoError};
pub use models::*;
