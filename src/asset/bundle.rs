//! JS and CSS bundling.
//!
//! JavaScript files are minified one by one and concatenated; their maps are
//! combined into a source map v3 *index map* with one section per file.
//! Stylesheets are minified per file, rebased against their own location,
//! then joined with newlines. Input order is output order.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use super::minify::{minify_css, minify_js};
use super::{AssetClass, CssUrlRebaser, MinifyError};
use crate::processor::{AssetEvent, AssetObserver};
use crate::utils::path::{relative_posix, to_posix};

/// Concatenated JavaScript and its index source map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsBundle {
    pub code: String,
    pub map: Option<String>,
}

impl JsBundle {
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

pub struct Bundler<'a> {
    root: PathBuf,
    rebaser: CssUrlRebaser,
    observer: &'a dyn AssetObserver,
}

impl<'a> Bundler<'a> {
    /// `root` names files in events and maps, and anchors CSS rebasing.
    pub fn new(root: impl Into<PathBuf>, observer: &'a dyn AssetObserver) -> Self {
        let root = root.into();
        Self {
            rebaser: CssUrlRebaser::new(&root),
            root,
            observer,
        }
    }

    /// Minify and concatenate JavaScript. An empty list yields an empty bundle.
    pub fn bundle_js(&self, files: &[PathBuf]) -> Result<JsBundle, MinifyError> {
        if files.is_empty() {
            return Ok(JsBundle::default());
        }

        let names = self.names(files);
        self.observer.notify(&AssetEvent::MinifyStarted {
            kind: AssetClass::Javascripts,
            files: names.clone(),
        });

        let mut code = String::new();
        let mut sections = Vec::with_capacity(files.len());
        let mut line = 0usize;

        for (path, name) in files.iter().zip(&names) {
            let source = read(path)?;
            let minified = minify_js(path, &source, Some(name))?;
            let chunk = minified.code.trim_end_matches('\n');

            if let Some(map) = minified.map {
                let map: Value = serde_json::from_str(&map)
                    .map_err(|err| MinifyError::syntax(path, format!("bad source map: {err}")))?;
                sections.push(json!({
                    "offset": { "line": line, "column": 0 },
                    "map": map,
                }));
            }

            if !code.is_empty() {
                code.push('\n');
            }
            code.push_str(chunk);
            line += chunk.matches('\n').count() + 1;
        }

        self.observer.notify(&AssetEvent::MinifyEnded {
            kind: AssetClass::Javascripts,
            files: names,
        });

        let map = (!sections.is_empty())
            .then(|| json!({ "version": 3, "sections": sections }).to_string());
        Ok(JsBundle { code, map })
    }

    /// Minify, rebase and concatenate stylesheets.
    pub fn bundle_css(&self, files: &[PathBuf]) -> Result<String, MinifyError> {
        if files.is_empty() {
            return Ok(String::new());
        }

        let names = self.names(files);
        self.observer.notify(&AssetEvent::MinifyStarted {
            kind: AssetClass::Stylesheets,
            files: names.clone(),
        });

        let mut parts = Vec::with_capacity(files.len());
        for path in files {
            let source = read(path)?;
            let minified = minify_css(path, &source)?;
            parts.push(self.rebaser.rebase(path, &minified));
        }

        self.observer.notify(&AssetEvent::MinifyEnded {
            kind: AssetClass::Stylesheets,
            files: names,
        });

        Ok(parts.join("\n"))
    }

    /// Rebased, unminified stylesheets joined with newlines. No events.
    ///
    /// This is the fingerprint input for CSS, so rewritten references change
    /// the published key.
    pub fn rebased_css(&self, files: &[PathBuf]) -> Result<String, MinifyError> {
        let mut parts = Vec::with_capacity(files.len());
        for path in files {
            let source = read(path)?;
            parts.push(self.rebaser.rebase(path, &source));
        }
        Ok(parts.join("\n"))
    }

    fn names(&self, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| relative_posix(f, &self.root).unwrap_or_else(|| to_posix(f)))
            .collect()
    }
}

fn read(path: &Path) -> Result<String, MinifyError> {
    fs::read_to_string(path).map_err(|err| MinifyError::Io(path.to_path_buf(), err))
}
