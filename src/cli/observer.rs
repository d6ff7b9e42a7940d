//! Console progress for lifecycle events.

use crate::log;
use crate::processor::{AssetEvent, AssetObserver};

/// Prints one line per event: a `log!` line, or a JSON line on stdout.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    json: bool,
}

impl LogObserver {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }
}

impl AssetObserver for LogObserver {
    fn notify(&self, event: &AssetEvent) {
        if self.json {
            if let Ok(line) = serde_json::to_string(event) {
                println!("{line}");
            }
            return;
        }

        match event {
            AssetEvent::FilesChecked { kind, changed } => {
                let state = if *changed { "changed" } else { "up to date" };
                log!("check"; "{}: {}", kind, state);
            }
            AssetEvent::MinifyStarted { kind, files } => {
                log!("minify"; "{}: {} file(s)", kind, files.len());
            }
            AssetEvent::MinifyEnded { kind, .. } => {
                crate::debug!("minify"; "{}: done", kind);
            }
            AssetEvent::UploadStarted { source, target, .. } => {
                crate::debug!("upload"; "{} -> {}", source, target);
            }
            AssetEvent::UploadEnded { source, url, .. } => {
                log!("upload"; "{} -> {}", source, url);
            }
        }
    }
}
