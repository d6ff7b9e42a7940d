//! Project configuration management for `assets.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── class      # [javascripts] [stylesheets] [images] [extras]
//! │   ├── publish    # [selection] [publish]
//! │   └── storage    # [storage]
//! ├── types/         # ConfigError, ConfigDiagnostics
//! ├── util.rs        # config file discovery
//! └── mod.rs         # AssetConfig (this file)
//! ```
//!
//! The configuration is immutable once loaded. Anything that needs a variant
//! (the `.less`-only stylesheet scan, for instance) derives a new value.

pub mod section;
pub mod types;
mod util;

pub use section::{
    ClassConfig, PublishConfig, SelectionConfig, StorageConfig, StorageProvider, StylesheetImport,
    StylesheetsConfig, TextMapping,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use util::find_config_file;

use crate::asset::AssetClass;
use crate::log;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing assets.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root. Relative values resolve against the config file's directory.
    pub root: PathBuf,

    pub storage: StorageConfig,
    pub selection: SelectionConfig,
    pub publish: PublishConfig,

    pub javascripts: ClassConfig,
    pub stylesheets: StylesheetsConfig,
    pub images: ClassConfig,
    pub extras: ClassConfig,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::from("."),
            storage: StorageConfig::default(),
            selection: SelectionConfig::default(),
            publish: PublishConfig::default(),
            javascripts: ClassConfig::default(),
            stylesheets: StylesheetsConfig::default(),
            images: ClassConfig::default(),
            extras: ClassConfig::default(),
        }
    }
}

impl AssetConfig {
    /// Load, resolve and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        let config_path = crate::utils::path::normalize_path(path);
        let base = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;
        config.resolve_paths(&base);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string (paths left unresolved).
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Anchor relative paths (root, local bucket) at `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.root.is_relative() {
            self.root = crate::utils::path::normalize_path(&base.join(&self.root));
        }
        if let Some(dir) = &self.storage.local_dir
            && dir.is_relative()
        {
            self.storage.local_dir = Some(base.join(dir));
        }
    }

    /// Replace the root (tests, CLI overrides).
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Validate everything an orchestrator needs before it can be built.
    ///
    /// # Checks
    /// - `root` exists and is a directory
    /// - every stylesheet import has a source and a destination
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if !self.root.exists() {
            diag.error("root", format!("directory not found: {}", self.root.display()));
        } else if !self.root.is_dir() {
            diag.error("root", format!("not a directory: {}", self.root.display()));
        }

        for (i, entry) in self.stylesheets.import.iter().enumerate() {
            if entry.source.trim().is_empty() {
                diag.error(format!("stylesheets.import[{i}].source"), "source url is empty");
            }
            if entry.destination.as_os_str().is_empty() {
                diag.error(
                    format!("stylesheets.import[{i}].destination"),
                    "destination is empty",
                );
            }
        }

        diag.into_result()
    }

    /// Validate storage settings (publishing only).
    pub fn validate_storage(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.storage.validate(&mut diag);
        diag.into_result()
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Selection rules for a class.
    pub fn class(&self, class: AssetClass) -> &ClassConfig {
        match class {
            AssetClass::Javascripts => &self.javascripts,
            AssetClass::Stylesheets => &self.stylesheets.class,
            AssetClass::Images => &self.images,
            AssetClass::Extras => &self.extras,
        }
    }

    /// Absolute class root (`root` joined with the class sub-root).
    pub fn class_root(&self, class: AssetClass) -> PathBuf {
        match self.class(class).sub_root() {
            Some(sub) => self.root.join(sub),
            None => self.root.clone(),
        }
    }

    /// Remote folder for a class.
    pub fn class_folder(&self, class: AssetClass) -> String {
        self.class(class).folder_for(class)
    }

    /// Local build output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.publish.output)
    }
}

/// Parse a config string for tests, anchoring paths at `root`.
#[cfg(test)]
pub fn test_parse_config(content: &str, root: &Path) -> AssetConfig {
    let mut config = AssetConfig::from_str(content).unwrap();
    config.root = PathBuf::from(".");
    config.resolve_paths(root);
    config
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AssetConfig::from_str("").unwrap();
        assert_eq!(config.root, PathBuf::from("."));
        assert!(config.selection.explicit_files_bypass_exclusions);
        assert!(config.publish.force_marker_classes);
        assert_eq!(config.stylesheets.less_command, vec!["lessc"]);
        assert_eq!(config.storage.max_retries, 3);
    }

    #[test]
    fn test_parse_full() {
        let config = AssetConfig::from_str(
            r#"
root = "public"

[storage]
provider = "local"
local_dir = "mirror"
cdn_domain = "cdn.example.com"

[selection]
explicit_files_bypass_exclusions = false

[javascripts]
directories = ["js"]
preference = ["js/vendor"]
exclude = ["js/tests"]

[stylesheets]
root = "css"
extensions = [".css"]

[[stylesheets.import]]
source = "https://github.com/org/repo/blob/main/theme.css"
destination = "vendor/theme.css"

[[stylesheets.mappings]]
from = "../img/"
to = "/images/"
"#,
        )
        .unwrap();

        assert_eq!(config.storage.provider, StorageProvider::Local);
        assert_eq!(config.storage.cdn_domain.as_deref(), Some("cdn.example.com"));
        assert!(!config.selection.explicit_files_bypass_exclusions);
        assert_eq!(config.javascripts.directories, vec!["js"]);
        assert_eq!(config.stylesheets.class.root, Some(PathBuf::from("css")));
        assert_eq!(config.stylesheets.import.len(), 1);
        assert_eq!(config.stylesheets.mappings[0].to, "/images/");
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) = AssetConfig::parse_with_ignored(
            r#"
bogus = 1
[javascripts]
sort = "name"
"#,
        )
        .unwrap();
        assert!(ignored.iter().any(|f| f == "bogus"));
        assert!(ignored.iter().any(|f| f.contains("sort")));
    }

    #[test]
    fn test_load_resolves_root_and_validates() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        let path = dir.path().join("assets.toml");
        fs::write(&path, "root = \"public\"\n[images]\nroot = \"img\"\n").unwrap();

        let config = AssetConfig::load(&path).unwrap();
        assert!(config.root.is_absolute());
        assert!(config.root.ends_with("public"));
        assert_eq!(config.class_root(AssetClass::Images), config.root.join("img"));
        assert_eq!(config.class_root(AssetClass::Javascripts), config.root);
    }

    #[test]
    fn test_missing_root_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets.toml");
        fs::write(&path, "root = \"nope\"\n").unwrap();

        let err = AssetConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Diagnostics(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AssetConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_empty_import_rejected() {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config(
            r#"
[[stylesheets.import]]
source = ""
destination = "x.css"
"#,
            dir.path(),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_class_folder_and_output() {
        let dir = TempDir::new().unwrap();
        let config = test_parse_config("[images]\nfolder = \"img\"\n", dir.path());
        assert_eq!(config.class_folder(AssetClass::Images), "img");
        assert_eq!(config.class_folder(AssetClass::Stylesheets), "css");
        assert_eq!(config.output_dir(), config.root.join("dist"));
    }
}
