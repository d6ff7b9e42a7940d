//! Configuration section definitions.
//!
//! | Section                  | Purpose                                   |
//! |--------------------------|-------------------------------------------|
//! | `[javascripts]` etc.     | Per-class file selection rules            |
//! | `[stylesheets]`          | Selection + LESS + external imports       |
//! | `[storage]`              | Object store, CDN mapping, retry policy   |
//! | `[selection]`            | Selection policies                        |
//! | `[publish]`              | Force semantics, local build output       |

mod class;
mod publish;
mod storage;

pub use class::{ClassConfig, StylesheetImport, StylesheetsConfig, TextMapping};
pub use publish::{PublishConfig, SelectionConfig};
pub use storage::{StorageConfig, StorageProvider};
