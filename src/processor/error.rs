use std::path::PathBuf;

use thiserror::Error;

use crate::asset::{AssetClass, CompileError, MinifyError, SelectError};
use crate::config::ConfigError;
use crate::import::ImportFailure;
use crate::storage::StorageError;

/// Any failure of a top-level verb. The verb stops at the first one.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error(transparent)]
    Minify(#[from] MinifyError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Import(#[from] ImportFailure),

    #[error("failed to fingerprint {0}")]
    Fingerprint(AssetClass, #[source] std::io::Error),

    #[error("failed to write `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("no storage configured")]
    NoStorage,
}
