//! Error types for the batch subsystem.
//!

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    /// The input container could not be decoded as an array of records.
    #[error("Malformed batch input: {0}")]
    MalformedBatchInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Reporting error: {0}")]
    Reporting(String),
}

impl BatchError {
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<toml::de::Error> for BatchError {
    fn from(error: toml::de::Error) -> Self {
        BatchError::Configuration(format!("Failed to parse config file: {error}"))
    }
}

pub type BatchResult<T> = std::result::Result<T, BatchError>;
