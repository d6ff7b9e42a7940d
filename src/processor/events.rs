//! Lifecycle events
//!
//! Progress reporting for the publish pipeline. Events carry no control-flow
//! meaning; subscribers only observe.
//!
//! ```text
//! files-checked ─► [minify-started ─► minify-ended] ─► upload-started ─► upload-ended
//! ```
//!
//! Within one class the order above is never changed. Classes run one
//! after another, so their events never interleave.

use crossbeam::channel::Sender;
use serde::Serialize;

use crate::asset::AssetClass;

// =============================================================================
// AssetEvent
// =============================================================================

/// One phase transition, serialized as `{"event": "files-checked", "type": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum AssetEvent {
    /// Target checked; emitted whether or not anything gets uploaded
    FilesChecked {
        #[serde(rename = "type")]
        kind: AssetClass,
        changed: bool,
    },
    MinifyStarted {
        #[serde(rename = "type")]
        kind: AssetClass,
        files: Vec<String>,
    },
    MinifyEnded {
        #[serde(rename = "type")]
        kind: AssetClass,
        files: Vec<String>,
    },
    UploadStarted {
        #[serde(rename = "type")]
        kind: AssetClass,
        target: String,
        source: String,
    },
    UploadEnded {
        #[serde(rename = "type")]
        kind: AssetClass,
        target: String,
        source: String,
        url: String,
    },
}

impl AssetEvent {
    /// Wire name of the event.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FilesChecked { .. } => "files-checked",
            Self::MinifyStarted { .. } => "minify-started",
            Self::MinifyEnded { .. } => "minify-ended",
            Self::UploadStarted { .. } => "upload-started",
            Self::UploadEnded { .. } => "upload-ended",
        }
    }

    pub const fn kind(&self) -> AssetClass {
        match self {
            Self::FilesChecked { kind, .. }
            | Self::MinifyStarted { kind, .. }
            | Self::MinifyEnded { kind, .. }
            | Self::UploadStarted { kind, .. }
            | Self::UploadEnded { kind, .. } => *kind,
        }
    }
}

// =============================================================================
// Observers
// =============================================================================

/// Subscriber for lifecycle events.
pub trait AssetObserver: Send + Sync {
    fn notify(&self, event: &AssetEvent);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl AssetObserver for NoopObserver {
    fn notify(&self, _event: &AssetEvent) {}
}

/// Forward events to a channel. A closed receiver is not an error.
impl AssetObserver for Sender<AssetEvent> {
    fn notify(&self, event: &AssetEvent) {
        let _ = self.send(event.clone());
    }
}

/// Keeps every event, for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    events: parking_lot::Mutex<Vec<AssetEvent>>,
}

#[cfg(test)]
impl RecordingObserver {
    pub fn take(&self) -> Vec<AssetEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(AssetEvent::name).collect()
    }
}

#[cfg(test)]
impl AssetObserver for RecordingObserver {
    fn notify(&self, event: &AssetEvent) {
        self.events.lock().push(event.clone());
    }
}
