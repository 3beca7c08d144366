use thiserror::Error;

/// Errors raised by the LLM answer strategies
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{0} is not set")]
    MissingCredential(&'static str),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("empty response")]
    EmptyResponse,

    #[error("cannot read mock file {path}: {source}")]
    MockFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the todo fetcher
#[derive(Error, Debug)]
pub enum TodoError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),
}

/// All possible errors in the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Todo error: {0}")]
    Todo(#[from] TodoError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
