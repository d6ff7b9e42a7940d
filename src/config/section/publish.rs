//! `[selection]` and `[publish]` sections.
//!
//! # Example
//!
//! ```toml
//! [selection]
//! explicit_files_bypass_exclusions = true
//!
//! [publish]
//! force_marker_classes = true  # --force also republishes images/extras
//! output = "dist"              # local build output, relative to root
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Files named in `files`/`preference` survive exclusion prefixes.
    pub explicit_files_bypass_exclusions: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            explicit_files_bypass_exclusions: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Apply the force flag to the marker-based classes (images, extras).
    pub force_marker_classes: bool,

    /// Output directory for local builds, relative to the project root.
    pub output: PathBuf,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            force_marker_classes: true,
            output: PathBuf::from("dist"),
        }
    }
}
