use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Neither a blob URL nor a contents-api URL. Raised before any request.
    #[error("invalid import url `{0}`")]
    InvalidUrl(String),

    #[error("HTTP {status} fetching `{url}`")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("failed to write `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}

impl From<reqwest::Error> for ImportError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}

/// An import queue stopped at its first failure.
#[derive(Debug, Error)]
#[error("import stopped after {succeeded} succeeded: {source}")]
pub struct ImportFailure {
    pub succeeded: usize,
    #[source]
    pub source: ImportError,
}
