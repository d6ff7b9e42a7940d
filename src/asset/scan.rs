//! File selection for one asset class.
//!
//! Turns a [`ClassConfig`] into an ordered, deduplicated file list:
//!
//! ```text
//! directories/files ──walk──► candidates ──filter──► dedupe ──rank──► FileSelection
//!                              (extension or          (exclude
//!                               explicit name)         prefixes)
//! ```
//!
//! Ordering is `(rank, lowercase path)`, where `rank` is the index of the
//! first matching `preference`/`files` entry and unmatched files rank last.
//! Selection only reads the filesystem.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use super::{AssetClass, SelectError};
use crate::config::ClassConfig;
use crate::log;
use crate::utils::path::{lexical_normalize, normalize_entry, relative_posix, to_posix};

// ============================================================================
// FileSelection
// ============================================================================

/// One selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Path relative to the class root, forward slashes.
    pub rel: String,
    /// Absolute filesystem path.
    pub abs: PathBuf,
}

/// Ordered selection result plus the non-fatal warnings raised on the way.
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
    /// Class root relative to the outer root ("" when they coincide).
    prefix: String,
    pub warnings: Vec<String>,
}

impl FileSelection {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    /// Absolute paths, in selection order.
    pub fn absolute(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.abs.clone()).collect()
    }

    /// Paths relative to the outer root, so listings of several classes
    /// share one base.
    pub fn relative(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|f| {
                if self.prefix.is_empty() {
                    f.rel.clone()
                } else {
                    format!("{}/{}", self.prefix, f.rel)
                }
            })
            .collect()
    }

    /// Either listing, as strings.
    pub fn paths(&self, absolute: bool) -> Vec<String> {
        if absolute {
            self.files
                .iter()
                .map(|f| f.abs.to_string_lossy().into_owned())
                .collect()
        } else {
            self.relative()
        }
    }
}

// ============================================================================
// PathMatcher
// ============================================================================

/// Resolves a class configuration against the filesystem.
pub struct PathMatcher<'a> {
    class: AssetClass,
    config: &'a ClassConfig,
    class_root: PathBuf,
    outer_root: PathBuf,
    bypass_exclusions: bool,
    /// Generated trees (build output, local bucket) never walked.
    skip_dirs: Vec<PathBuf>,
}

impl<'a> PathMatcher<'a> {
    pub fn new(
        class: AssetClass,
        config: &'a ClassConfig,
        class_root: impl Into<PathBuf>,
        outer_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            class,
            config,
            class_root: class_root.into(),
            outer_root: outer_root.into(),
            bypass_exclusions: true,
            skip_dirs: Vec::new(),
        }
    }

    /// Whether explicitly named files survive exclusion prefixes.
    pub fn bypass_exclusions(mut self, bypass: bool) -> Self {
        self.bypass_exclusions = bypass;
        self
    }

    /// Prune these directories from every walk. A directory that contains
    /// the walked one is ignored, so an output dir equal to the root is harmless.
    pub fn skip_dirs<I>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.skip_dirs = dirs.into_iter().map(|d| lexical_normalize(&d)).collect();
        self
    }

    pub fn class_root(&self) -> &Path {
        &self.class_root
    }

    /// Select, filter and order the class's files.
    pub fn select(&self) -> Result<FileSelection, SelectError> {
        let mut warnings = Vec::new();
        let candidates = self.collect_candidates(&mut warnings)?;

        let extensions: FxHashSet<String> =
            self.config.extensions_for(self.class).into_iter().collect();
        let rank_entries: Vec<String> = self
            .config
            .rank_entries()
            .into_iter()
            .map(|e| e.to_lowercase())
            .collect();
        let explicit: FxHashSet<&str> = rank_entries
            .iter()
            .filter(|e| has_extension(e))
            .map(String::as_str)
            .collect();
        let excludes: Vec<String> = self
            .config
            .exclude
            .iter()
            .map(|e| normalize_entry(e).to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        self.check_preferred(&mut warnings);

        let mut seen = FxHashSet::default();
        let mut ranked = Vec::new();
        for abs in candidates {
            let Some(rel) = relative_posix(&abs, &self.class_root) else {
                continue;
            };
            let lower = rel.to_lowercase();
            let is_explicit = explicit.contains(lower.as_str());

            let ext_ok = Path::new(&lower)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(e));
            if !ext_ok && !is_explicit {
                continue;
            }

            let excluded = excludes.iter().any(|prefix| lower.starts_with(prefix.as_str()));
            if excluded && !(is_explicit && self.bypass_exclusions) {
                continue;
            }

            if !seen.insert(rel.clone()) {
                continue;
            }

            let rank = rank_of(&lower, &rank_entries);
            ranked.push((rank, lower, SelectedFile { rel, abs }));
        }

        // original path last: `A.js` and `a.js` may coexist
        ranked.sort_by(|a, b| (a.0, &a.1, &a.2.rel).cmp(&(b.0, &b.1, &b.2.rel)));

        let prefix = match relative_posix(&self.class_root, &self.outer_root) {
            Some(prefix) => prefix,
            None => {
                warnings.push(format!(
                    "class root {} is outside the project root, listing absolute paths",
                    to_posix(&self.class_root)
                ));
                to_posix(&self.class_root).trim_end_matches('/').to_string()
            }
        };

        for warning in &warnings {
            log!("warning"; "{}: {}", self.class, warning);
        }

        Ok(FileSelection {
            files: ranked.into_iter().map(|(_, _, file)| file).collect(),
            prefix,
            warnings,
        })
    }

    /// Walk every search directory and gather explicit files.
    fn collect_candidates(&self, warnings: &mut Vec<String>) -> Result<Vec<PathBuf>, SelectError> {
        let mut candidates = Vec::new();

        let directories: Vec<String> = self
            .config
            .directories
            .iter()
            .map(|d| normalize_entry(d))
            .collect();
        if directories.is_empty() {
            self.walk_dir(&self.class_root, &mut candidates, warnings)?;
        } else {
            for dir in &directories {
                self.walk_dir(&self.join(dir), &mut candidates, warnings)?;
            }
        }

        for entry in self.config.files.iter().map(|f| normalize_entry(f)) {
            let path = self.join(&entry);
            if path.is_dir() {
                self.walk_dir(&path, &mut candidates, warnings)?;
            } else if path.is_file() {
                candidates.push(path);
            } else {
                warnings.push(format!("explicit file not found: {entry}"));
            }
        }

        Ok(candidates)
    }

    fn walk_dir(
        &self,
        dir: &Path,
        out: &mut Vec<PathBuf>,
        warnings: &mut Vec<String>,
    ) -> Result<(), SelectError> {
        if !dir.is_dir() {
            warnings.push(format!("directory not found: {}", self.display(dir)));
            return Ok(());
        }
        let dir_norm = lexical_normalize(dir);
        let skip: Vec<&PathBuf> = self
            .skip_dirs
            .iter()
            .filter(|s| !dir_norm.starts_with(s))
            .collect();

        for entry in WalkDir::new(dir).skip_hidden(false) {
            let entry = entry.map_err(|source| SelectError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if skip.is_empty() || !skip.iter().any(|s| lexical_normalize(&path).starts_with(s)) {
                out.push(path);
            }
        }
        Ok(())
    }

    /// Warn about preferred files that do not exist.
    fn check_preferred(&self, warnings: &mut Vec<String>) {
        for entry in self.config.preference.iter().map(|p| normalize_entry(p)) {
            if has_extension(&entry) && !self.join(&entry).is_file() {
                warnings.push(format!("preferred file not found: {entry}"));
            }
        }
    }

    fn join(&self, entry: &str) -> PathBuf {
        if entry.is_empty() {
            self.class_root.clone()
        } else {
            self.class_root.join(entry)
        }
    }

    fn display(&self, path: &Path) -> String {
        relative_posix(path, &self.outer_root).unwrap_or_else(|| to_posix(path))
    }
}

fn has_extension(entry: &str) -> bool {
    Path::new(entry).extension().is_some()
}

/// Index of the first entry matching `lower`, or `entries.len()`.
///
/// Entries with an extension match exactly; others match as containing
/// directories. The empty entry (the class root) contains everything.
fn rank_of(lower: &str, entries: &[String]) -> usize {
    entries
        .iter()
        .position(|entry| {
            if has_extension(entry) {
                lower == entry
            } else {
                entry.is_empty()
                    || lower
                        .strip_prefix(entry.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        })
        .unwrap_or(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    fn select(class: AssetClass, config: &ClassConfig, root: &Path) -> FileSelection {
        PathMatcher::new(class, config, root, root).select().unwrap()
    }

    #[test]
    fn test_directories_and_extensions() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "js/b.js");
        touch(dir.path(), "js/a.js");
        touch(dir.path(), "js/readme.md");
        touch(dir.path(), "other/c.js");

        let config = ClassConfig {
            directories: vec!["js".into()],
            ..Default::default()
        };
        let selection = select(AssetClass::Javascripts, &config, dir.path());
        assert_eq!(selection.relative(), vec!["js/a.js", "js/b.js"]);
        assert!(selection.warnings.is_empty());
    }

    #[test]
    fn test_preference_ordering() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.css");
        touch(dir.path(), "b.css");
        touch(dir.path(), "dirA/c.css");
        touch(dir.path(), "z.css");

        let config = ClassConfig {
            preference: vec!["b.css".into(), "dirA".into()],
            ..Default::default()
        };
        let selection = select(AssetClass::Stylesheets, &config, dir.path());
        assert_eq!(selection.relative(), vec!["b.css", "dirA/c.css", "a.css", "z.css"]);
    }

    #[test]
    fn test_ties_sort_case_insensitively() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "B.js");
        touch(dir.path(), "a.js");
        touch(dir.path(), "c.JS");

        let selection = select(AssetClass::Javascripts, &ClassConfig::default(), dir.path());
        assert_eq!(selection.relative(), vec!["a.js", "B.js", "c.JS"]);
    }

    #[test]
    fn test_directory_rank_needs_separator() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "lib/a.js");
        touch(dir.path(), "library/b.js");
        touch(dir.path(), "0.js");

        let config = ClassConfig {
            preference: vec!["lib".into()],
            ..Default::default()
        };
        let selection = select(AssetClass::Javascripts, &config, dir.path());
        assert_eq!(selection.relative(), vec!["lib/a.js", "0.js", "library/b.js"]);
    }

    #[test]
    fn test_exclusion_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "js/app.js");
        touch(dir.path(), "js/Tests/spec.js");

        let config = ClassConfig {
            exclude: vec!["JS/tests".into()],
            ..Default::default()
        };
        let selection = select(AssetClass::Javascripts, &config, dir.path());
        assert_eq!(selection.relative(), vec!["js/app.js"]);
    }

    #[test]
    fn test_explicit_file_bypass_policy() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "vendor/keep.js");
        touch(dir.path(), "vendor/drop.js");
        touch(dir.path(), "app.js");

        let config = ClassConfig {
            preference: vec!["vendor/keep.js".into()],
            exclude: vec!["vendor".into()],
            ..Default::default()
        };

        let bypass = PathMatcher::new(AssetClass::Javascripts, &config, dir.path(), dir.path())
            .select()
            .unwrap();
        assert_eq!(bypass.relative(), vec!["vendor/keep.js", "app.js"]);

        let strict = PathMatcher::new(AssetClass::Javascripts, &config, dir.path(), dir.path())
            .bypass_exclusions(false)
            .select()
            .unwrap();
        assert_eq!(strict.relative(), vec!["app.js"]);
    }

    #[test]
    fn test_explicit_file_with_foreign_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "legacy/shim.txt");
        touch(dir.path(), "main.js");

        let config = ClassConfig {
            files: vec!["legacy/shim.txt".into()],
            ..Default::default()
        };
        let selection = select(AssetClass::Javascripts, &config, dir.path());
        assert_eq!(selection.relative(), vec!["legacy/shim.txt", "main.js"]);
    }

    #[test]
    fn test_no_duplicates() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "js/a.js");

        let config = ClassConfig {
            directories: vec!["js".into(), "./js/".into()],
            files: vec!["js/a.js".into(), "js".into()],
            ..Default::default()
        };
        let selection = select(AssetClass::Javascripts, &config, dir.path());
        assert_eq!(selection.relative(), vec!["js/a.js"]);
    }

    #[test]
    fn test_missing_entries_warn() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "js/a.js");

        let config = ClassConfig {
            directories: vec!["js".into(), "gone".into()],
            files: vec!["missing.js".into()],
            preference: vec!["also-missing.js".into()],
            ..Default::default()
        };
        let selection = select(AssetClass::Javascripts, &config, dir.path());
        assert_eq!(selection.relative(), vec!["js/a.js"]);
        assert_eq!(selection.warnings.len(), 3);
        assert!(selection.warnings.iter().any(|w| w.contains("gone")));
        assert!(selection.warnings.iter().any(|w| w.contains("missing.js")));
        assert!(selection.warnings.iter().any(|w| w.contains("also-missing.js")));
    }

    #[test]
    fn test_output_modes() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "public/images/logo.png");
        let class_root = dir.path().join("public/images");

        let config = ClassConfig::default();
        let selection = PathMatcher::new(AssetClass::Images, &config, &class_root, dir.path())
            .select()
            .unwrap();
        assert_eq!(selection.relative(), vec!["public/images/logo.png"]);
        assert_eq!(selection.files()[0].rel, "logo.png");
        assert_eq!(selection.absolute(), vec![class_root.join("logo.png")]);
        assert!(Path::new(&selection.paths(true)[0]).is_absolute());
    }

    #[test]
    fn test_class_root_outside_project_warns() {
        let project = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        touch(elsewhere.path(), "logo.png");

        let config = ClassConfig::default();
        let selection =
            PathMatcher::new(AssetClass::Images, &config, elsewhere.path(), project.path())
                .select()
                .unwrap();
        assert!(selection.warnings.iter().any(|w| w.contains("outside the project root")));
        assert_eq!(
            selection.relative(),
            vec![format!("{}/logo.png", to_posix(elsewhere.path()).trim_end_matches('/'))]
        );
    }

    #[test]
    fn test_skip_dirs_pruned_unless_ancestor() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "js/a.js");
        touch(dir.path(), "dist/js/bundle.js");
        let config = ClassConfig::default();

        let selection = PathMatcher::new(AssetClass::Javascripts, &config, dir.path(), dir.path())
            .skip_dirs([dir.path().join("dist")])
            .select()
            .unwrap();
        assert_eq!(selection.relative(), vec!["js/a.js"]);

        // output at the root itself prunes nothing
        let selection = PathMatcher::new(AssetClass::Javascripts, &config, dir.path(), dir.path())
            .skip_dirs([dir.path().join(".")])
            .select()
            .unwrap();
        assert_eq!(selection.len(), 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_case_only_ties_are_ordered() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.js");
        touch(dir.path(), "B.js");
        touch(dir.path(), "a.js");

        let config = ClassConfig::default();
        let selection = select(AssetClass::Javascripts, &config, dir.path());
        assert_eq!(selection.relative(), vec!["a.js", "B.js", "b.js"]);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["x/3.css", "x/1.css", "y/2.css", "0.css"] {
            touch(dir.path(), name);
        }
        let config = ClassConfig {
            preference: vec!["y".into()],
            ..Default::default()
        };
        let first = select(AssetClass::Stylesheets, &config, dir.path());
        let second = select(AssetClass::Stylesheets, &config, dir.path());
        assert_eq!(first.relative(), second.relative());
        assert_eq!(first.relative(), vec!["y/2.css", "0.css", "x/1.css", "x/3.css"]);
    }
}
