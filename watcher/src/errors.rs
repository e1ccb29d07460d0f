//! Error types for the Zipp watcher

use thiserror::Error;

/// Main error type for the Zipp watcher
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for WatchError {
    fn from(err: anyhow::Error) -> Self {
        WatchError::Internal(err.to_string())
    }
}
