//! Errors raised while selecting, minifying and compiling assets.

use std::path::PathBuf;
use thiserror::Error;

/// File selection failed (filesystem error).
///
/// Missing configured entries are warnings, not errors. Only an unreadable
/// tree aborts selection.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("failed to walk `{path}`")]
    Walk {
        path: PathBuf,
        #[source]
        source: jwalk::Error,
    },
}

/// Minification failed (syntax error or I/O).
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("syntax error in `{path}`: {message}")]
    Syntax { path: PathBuf, message: String },

    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}

impl MinifyError {
    pub fn syntax(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// LESS compilation failed.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to compile `{path}`")]
    Render {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to access `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Select(#[from] SelectError),
}
