use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, schedule, and storage layers.
#[derive(Debug, Error)]
pub enum BillError {
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid record `{id}`: {reason}")]
    InvalidRecord { id: String, reason: String },
}

pub type Result<T> = StdResult<T, BillError>;

impl From<std::io::Error> for BillError {
    fn from(err: std::io::Error) -> Self {
        BillError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BillError {
    fn from(err: serde_json::Error) -> Self {
        BillError::StorageError(err.to_string())
    }
}

impl From<rusqlite::Error> for BillError {
    fn from(err: rusqlite::Error) -> Self {
        BillError::StorageError(err.to_string())
    }
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BillError),
    #[error(transparent)]
    Service(#[from] crate::core::services::ServiceError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}
