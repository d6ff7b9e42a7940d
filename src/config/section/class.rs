//! `[javascripts]`, `[stylesheets]`, `[images]` and `[extras]` sections.
//!
//! # Example
//!
//! ```toml
//! [javascripts]
//! root = "javascripts"          # relative to the project root (default: the root)
//! folder = "js"                 # remote folder for published objects
//! directories = ["vendor", "app"]
//! files = ["legacy/shim.js"]
//! extensions = [".js"]
//! preference = ["vendor/jquery.js", "vendor"]
//! exclude = ["app/tests"]
//!
//! [stylesheets]
//! less_command = ["lessc"]
//! github_token_env = "GITHUB_TOKEN"
//!
//! [[stylesheets.import]]
//! source = "https://github.com/org/theme/blob/main/dist/theme.css"
//! destination = "vendor/theme.css"
//!
//! [[stylesheets.mappings]]
//! from = "../fonts/"
//! to = "/extras/fonts/"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::asset::AssetClass;
use crate::utils::path::normalize_entry;

/// File selection rules for one asset class.
///
/// `folder` and `extensions` fall back to per-class defaults (see
/// [`AssetClass`]) when absent. Without `root` the class scans the project
/// root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassConfig {
    /// Sub-root under the project root.
    pub root: Option<PathBuf>,

    /// Remote folder name for published objects.
    pub folder: Option<String>,

    /// Search directories, relative to the class root. Empty = the root itself.
    pub directories: Vec<String>,

    /// Explicitly named files (or directories), relative to the class root.
    pub files: Vec<String>,

    /// Allowed extensions, with or without the leading dot.
    pub extensions: Option<Vec<String>>,

    /// Ordering overrides: files (with extension) or directories.
    pub preference: Vec<String>,

    /// Relative path prefixes to drop, matched case-insensitively.
    pub exclude: Vec<String>,
}

impl ClassConfig {
    /// Class root relative to the project root, if one is configured.
    pub fn sub_root(&self) -> Option<&Path> {
        self.root
            .as_deref()
            .filter(|r| !r.as_os_str().is_empty() && *r != Path::new("."))
    }

    /// Remote folder, without surrounding slashes.
    pub fn folder_for(&self, class: AssetClass) -> String {
        self.folder
            .as_deref()
            .map(|f| f.trim_matches('/').to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| class.default_folder().to_string())
    }

    /// Allowed extensions, lowercase and without the leading dot.
    pub fn extensions_for(&self, class: AssetClass) -> Vec<String> {
        match &self.extensions {
            Some(list) => list
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
            None => class
                .default_extensions()
                .iter()
                .map(|e| (*e).to_string())
                .collect(),
        }
    }

    /// Derived copy restricted to the given extensions.
    pub fn with_extensions<I, S>(&self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: Some(extensions.into_iter().map(Into::into).collect()),
            ..self.clone()
        }
    }

    /// Ordering entries: `preference` followed by `files`, normalized.
    pub fn rank_entries(&self) -> Vec<String> {
        self.preference
            .iter()
            .chain(self.files.iter())
            .map(|e| normalize_entry(e))
            .collect()
    }
}

/// `[stylesheets]`: selection rules plus LESS and import settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesheetsConfig {
    #[serde(flatten)]
    pub class: ClassConfig,

    /// LESS compiler command; the source is piped on stdin.
    pub less_command: Vec<String>,

    /// External stylesheets fetched by `import`.
    pub import: Vec<StylesheetImport>,

    /// Literal replacements applied to every imported file, in order.
    pub mappings: Vec<TextMapping>,

    /// Environment variable holding the hosting-api token.
    pub github_token_env: Option<String>,
}

impl Default for StylesheetsConfig {
    fn default() -> Self {
        Self {
            class: ClassConfig::default(),
            less_command: vec!["lessc".to_string()],
            import: Vec::new(),
            mappings: Vec::new(),
            github_token_env: Some("GITHUB_TOKEN".to_string()),
        }
    }
}

/// One external stylesheet: hosting-api (or blob) URL and local destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylesheetImport {
    pub source: String,
    /// Relative to the stylesheets root.
    pub destination: PathBuf,
}

/// Literal string replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMapping {
    pub from: String,
    pub to: String,
}
