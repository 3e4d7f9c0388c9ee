use thiserror::Error;

#[derive(Error, Debug)]
pub enum CiGateError {
    #[error("Malformed filter directive: {0}")]
    Directive(String),

    #[error("{count} invalid pattern(s) in filter directive")]
    InvalidPatterns { count: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read commit message: {0}")]
    Commit(String),

    #[error("Build dispatch failed: {0}")]
    Dispatch(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CiGateError>;
