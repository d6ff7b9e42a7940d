//! Remote object storage.
//!
//! ```text
//! StorageClient ── retry / timeout / public URLs
//!      │
//!      └── dyn ObjectStore ── HttpObjectStore  (S3-compatible, path-style)
//!                          └─ LocalObjectStore (directory bucket)
//! ```

mod client;
mod error;
mod local;
mod retry;
mod transport;

pub use client::{ACL_HEADER, CONTENT_TYPE, StorageClient};
pub use error::{StorageError, StorageResult};
pub use local::LocalObjectStore;
pub use retry::RetryPolicy;
pub use transport::{Headers, HttpObjectStore, ObjectStore, PutBody};
