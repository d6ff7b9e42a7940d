//! External stylesheet import.
//!
//! Fetches configured files from a hosting api into the stylesheets tree,
//! then applies literal text mappings. Runs before the publish pipeline and
//! independently of it.

mod error;
mod source;

pub use error::{ImportError, ImportFailure};
pub use source::{GithubContentSource, RawContentSource, api_url};

use std::path::{Path, PathBuf};

use crate::config::{StylesheetImport, TextMapping};
use crate::log;

pub struct GitImporter<'a> {
    source: &'a dyn RawContentSource,
    token: Option<String>,
    /// Destinations are relative to this directory.
    dest_root: PathBuf,
    mappings: &'a [TextMapping],
}

impl<'a> GitImporter<'a> {
    pub fn new(source: &'a dyn RawContentSource, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            token: None,
            dest_root: dest_root.into(),
            mappings: &[],
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_mappings(mut self, mappings: &'a [TextMapping]) -> Self {
        self.mappings = mappings;
        self
    }

    /// Import every entry in order. Stops at the first failure.
    pub async fn import_all(
        &self,
        imports: &[StylesheetImport],
    ) -> Result<Vec<PathBuf>, ImportFailure> {
        let mut written = Vec::with_capacity(imports.len());
        for entry in imports {
            match self.import_one(entry).await {
                Ok(path) => written.push(path),
                Err(source) => {
                    return Err(ImportFailure {
                        succeeded: written.len(),
                        source,
                    });
                }
            }
        }
        Ok(written)
    }

    /// Fetch one file, write it, then rewrite it with the mappings.
    pub async fn import_one(&self, entry: &StylesheetImport) -> Result<PathBuf, ImportError> {
        let url = api_url(&entry.source)?;
        let bytes = self.source.fetch(&url, self.token.as_deref()).await?;

        let target = self.dest_root.join(&entry.destination);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| ImportError::Io(parent.to_path_buf(), err))?;
        }
        write(&target, &bytes).await?;

        if !self.mappings.is_empty() {
            match std::str::from_utf8(&bytes) {
                Ok(text) => {
                    let mapped = apply_mappings(text, self.mappings);
                    write(&target, mapped.as_bytes()).await?;
                }
                Err(err) => {
                    log!("warning"; "{} is not UTF-8 ({}), mappings skipped", entry.destination.display(), err);
                }
            }
        }

        log!("import"; "{} -> {}", entry.source, entry.destination.display());
        Ok(target)
    }
}

/// Literal replace-all of each mapping, in order.
pub fn apply_mappings(text: &str, mappings: &[TextMapping]) -> String {
    mappings
        .iter()
        .filter(|m| !m.from.is_empty())
        .fold(text.to_string(), |acc, m| acc.replace(&m.from, &m.to))
}

async fn write(path: &Path, data: &[u8]) -> Result<(), ImportError> {
    tokio::fs::write(path, data)
        .await
        .map_err(|err| ImportError::Io(path.to_path_buf(), err))
}
