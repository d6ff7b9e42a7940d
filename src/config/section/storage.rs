//! `[storage]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [storage]
//! provider = "http"                      # http | local
//! endpoint = "https://s3.amazonaws.com"  # object store endpoint
//! bucket = "my-assets"
//! cdn_domain = "cdn.example.com"         # optional CDN in front of the bucket
//! token_env = "ASSETPUSH_TOKEN"          # optional bearer token
//! max_retries = 3
//! retry_base_ms = 100
//! fail_fast = false                      # stop retrying on permanent 4xx errors
//! timeout_secs = 30                      # optional, no timeout by default
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::ConfigDiagnostics;

/// Which transport backs the storage client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    /// S3-compatible HTTP endpoint (path-style `PUT`/`HEAD`).
    #[default]
    Http,
    /// Directory-backed bucket, for mirrors and dry runs.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub provider: StorageProvider,

    /// Public endpoint of the object store (`{endpoint}/{bucket}/{key}`).
    pub endpoint: String,

    pub bucket: String,

    /// CDN domain mapped onto the bucket. Public URLs point here when set.
    pub cdn_domain: Option<String>,

    /// Environment variable holding a bearer token for the store.
    pub token_env: Option<String>,

    /// Bucket directory for `provider = "local"`, relative to the config file.
    pub local_dir: Option<PathBuf>,

    /// Upload objects without the public-read ACL.
    pub private: bool,

    /// Retries after the first failed put.
    pub max_retries: u32,

    /// Base backoff unit; doubles on every retry.
    pub retry_base_ms: u64,

    /// Give up on client errors (4xx except 408/429) without retrying.
    pub fail_fast: bool,

    /// Per-request deadline. None keeps requests unbounded.
    pub timeout_secs: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::Http,
            endpoint: "https://s3.amazonaws.com".to_string(),
            bucket: String::new(),
            cdn_domain: None,
            token_env: None,
            local_dir: None,
            private: false,
            max_retries: 3,
            retry_base_ms: 100,
            fail_fast: false,
            timeout_secs: None,
        }
    }
}

impl StorageConfig {
    pub fn retry_base(&self) -> Duration {
        Duration::from_millis(self.retry_base_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Resolve the bearer token from the configured environment variable.
    pub fn token(&self) -> Option<String> {
        self.token_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|t| !t.is_empty())
    }

    /// Validate storage settings. Only required when publishing.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        match self.provider {
            StorageProvider::Http => {
                if self.bucket.trim().is_empty() {
                    diag.error_with_hint(
                        "storage.bucket",
                        "bucket is required for provider \"http\"",
                        "set `bucket = \"...\"` under [storage]",
                    );
                }
                if url::Url::parse(&self.endpoint).is_err() {
                    diag.error(
                        "storage.endpoint",
                        format!("invalid endpoint url: {}", self.endpoint),
                    );
                }
            }
            StorageProvider::Local => {
                if self.local_dir.is_none() {
                    diag.error_with_hint(
                        "storage.local_dir",
                        "local_dir is required for provider \"local\"",
                        "set `local_dir = \"cdn-mirror\"` under [storage]",
                    );
                }
            }
        }
    }
}
