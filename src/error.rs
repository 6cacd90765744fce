//! Error handling for the jobfoyu client

use crate::workflow::RequestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobfoyuError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// A workflow request ended in the failed state.
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

/// Failures talking to the matching/analysis service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-2xx response. `detail` is the server's message when the body carried one.
    #[error("service returned status {status}{}", .detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    /// 2xx response whose body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Server-provided detail message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ServiceError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else {
            ServiceError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, JobfoyuError>;
