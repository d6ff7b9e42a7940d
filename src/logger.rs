//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro gated by the global verbose flag
//!
//! # Example
//!
//! ```ignore
//! log!("upload"; "{} -> {}", source, target);
//! debug!("select"; "{} candidates under {}", count, dir.display());
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Global quiet flag (set when stdout carries machine-readable output)
static QUIET: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Suppress everything except warnings and errors.
pub fn set_quiet(q: bool) {
    QUIET.store(q, Ordering::SeqCst);
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// Written to stderr so stdout stays free for manifests and JSON events.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    if QUIET.load(Ordering::SeqCst) && !matches!(module_lower.as_str(), "warning" | "error") {
        return;
    }
    let prefix = colorize_prefix(module, &module_lower);

    let mut out = stderr().lock();
    execute!(out, Clear(ClearType::UntilNewLine)).ok();
    writeln!(out, "{prefix} {message}").ok();
    out.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let style = match module_lower {
        "upload" | "publish" => Style::new().bright_blue(),
        "check" | "build" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        "warning" => Style::new().yellow(),
        _ => Style::new().bright_yellow(),
    };
    paint(&format!("[{module}]"), style.bold())
}

/// Style `text` for stderr, honoring `--color` and terminal detection.
pub fn paint(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stderr, |t| t.style(style))
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_contains_module() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("upload", "upload"), "[upload]");
        assert_eq!(colorize_prefix("Check", "check"), "[Check]");
    }

    #[test]
    fn test_paint_follows_color_override() {
        owo_colors::set_override(false);
        assert_eq!(paint("[error]", Style::new().bright_red().bold()), "[error]");
        assert!(!colorize_prefix("warning", "warning").contains('\x1b'));
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
