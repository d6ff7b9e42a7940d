//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `lexical_normalize` - resolve `.`/`..` without touching the filesystem
//! - `to_posix` / `relative_posix` - forward-slash strings for selection output

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve `.` and `..` components purely lexically.
///
/// Used for CSS references, which may point at files that do not exist yet.
/// A `..` at the root is dropped, like a browser resolving `/../a`.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Join path components with forward slashes, whatever the host separator.
pub fn to_posix(path: &Path) -> String {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => parts.push("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    let joined = parts.join("/");
    if path.has_root() {
        format!("/{joined}")
    } else {
        joined
    }
}

/// `path` relative to `base` as a forward-slash string, if it lives under it.
pub fn relative_posix(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(to_posix)
}

/// Normalize a user-written config entry (`./js\vendor/` -> `js/vendor`).
pub fn normalize_entry(entry: &str) -> String {
    let unified = entry.replace('\\', "/");
    let trimmed = unified.trim();
    let mut rest = trimmed;
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    let rest = rest.trim_end_matches('/');
    if rest == "." { String::new() } else { rest.to_string() }
}
