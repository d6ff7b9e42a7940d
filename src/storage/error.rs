use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Transport failure talking to the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP {status} for `{key}`")]
    HttpStatus { status: u16, key: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to access `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid storage endpoint: {0}")]
    InvalidEndpoint(String),
}

impl StorageError {
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Self::Http(msg.into())
    }

    pub fn http_status(status: u16, key: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            key: key.into(),
        }
    }

    /// Whether a retry can change the outcome. Consulted only by
    /// fail-fast retry policies.
    ///
    /// Client errors other than 408/429 and bad endpoints are permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) | Self::Io(..) => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::InvalidEndpoint(_) => false,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
