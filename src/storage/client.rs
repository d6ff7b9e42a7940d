//! Storage client: existence checks, puts with retry, public URLs.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use super::transport::{Headers, ObjectStore, PutBody};
use super::{HttpObjectStore, LocalObjectStore, RetryPolicy, StorageError, StorageResult};
use crate::config::{StorageConfig, StorageProvider};
use crate::debug;
use crate::utils::{mime, path::normalize_key};

/// Header carrying the canned ACL.
pub const ACL_HEADER: &str = "x-amz-acl";
pub const CONTENT_TYPE: &str = "content-type";

pub struct StorageClient {
    store: Arc<dyn ObjectStore>,
    /// `https://cdn.example.com` or `{endpoint}/{bucket}`, no trailing slash.
    public_base: String,
    retry: RetryPolicy,
    timeout: Option<Duration>,
    private: bool,
}

impl StorageClient {
    pub fn new(store: Arc<dyn ObjectStore>, public_base: impl Into<String>) -> Self {
        Self {
            store,
            public_base: public_base.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
            timeout: None,
            private: false,
        }
    }

    /// Build the configured transport and URL mapping.
    pub fn from_config(config: &StorageConfig) -> StorageResult<Self> {
        let (store, direct_base): (Arc<dyn ObjectStore>, String) = match config.provider {
            StorageProvider::Http => {
                let store = HttpObjectStore::new(&config.endpoint, &config.bucket, config.token())?;
                let base = format!(
                    "{}/{}",
                    config.endpoint.trim_end_matches('/'),
                    config.bucket
                );
                (Arc::new(store), base)
            }
            StorageProvider::Local => {
                let dir = config.local_dir.clone().ok_or_else(|| {
                    StorageError::InvalidEndpoint("local provider needs local_dir".into())
                })?;
                let base = url::Url::from_directory_path(&dir)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|()| dir.to_string_lossy().into_owned());
                (Arc::new(LocalObjectStore::new(dir)), base)
            }
        };

        let public_base = match config.cdn_domain.as_deref().map(str::trim) {
            Some(cdn) if !cdn.is_empty() => cdn_base(cdn),
            _ => direct_base,
        };

        Ok(Self::new(store, public_base)
            .with_retry(RetryPolicy {
                max_retries: config.max_retries,
                base_delay: config.retry_base(),
                fail_fast: config.fail_fast,
                ..RetryPolicy::default()
            })
            .with_timeout(config.timeout())
            .with_private(config.private))
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    /// Fully-qualified URL for `key`.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base, normalize_key(key))
    }

    /// ACL plus a content type guessed from the key's extension.
    pub fn default_headers(&self, key: &str) -> Headers {
        let mut headers = Headers::new();
        if !self.private {
            headers.insert(ACL_HEADER, "public-read");
        }
        headers.insert(CONTENT_TYPE, mime::from_path(key));
        headers
    }

    /// Metadata check. Failures propagate without retry.
    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        let key = normalize_key(key);
        self.with_deadline(self.store.head(&key)).await
    }

    /// Upload an in-memory buffer. Returns the public URL.
    pub async fn put_buffer(
        &self,
        bytes: impl Into<Bytes>,
        key: &str,
        headers: Option<Headers>,
    ) -> StorageResult<String> {
        self.put(key, PutBody::Bytes(bytes.into()), headers).await
    }

    /// Upload a file, streamed from disk. Returns the public URL.
    pub async fn put_file(
        &self,
        path: &Path,
        key: &str,
        headers: Option<Headers>,
    ) -> StorageResult<String> {
        self.put(key, PutBody::File(path.to_path_buf()), headers).await
    }

    async fn put(&self, key: &str, body: PutBody, headers: Option<Headers>) -> StorageResult<String> {
        let key = normalize_key(key);
        let headers = match headers {
            Some(extra) => self.default_headers(&key).merge(extra),
            None => self.default_headers(&key),
        };

        self.retry
            .run(&key, || self.with_deadline(self.store.put(&key, &body, &headers)))
            .await?;

        debug!("storage"; "stored {}", key);
        Ok(self.public_url(&key))
    }

    async fn with_deadline<T>(
        &self,
        fut: impl Future<Output = StorageResult<T>>,
    ) -> StorageResult<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| StorageError::Timeout(limit))?,
            None => fut.await,
        }
    }
}

/// `cdn.example.com` -> `https://cdn.example.com`; explicit schemes are kept.
fn cdn_base(cdn: &str) -> String {
    let cdn = cdn.trim_end_matches('/');
    if cdn.contains("://") {
        cdn.to_string()
    } else {
        format!("https://{cdn}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    /// Fails the first `failures` puts, then records.
    #[derive(Default)]
    struct FlakyStore {
        failures: u32,
        calls: AtomicU32,
        puts: Mutex<Vec<(String, Headers)>>,
    }

    #[async_trait]
    impl ObjectStore for FlakyStore {
        async fn head(&self, key: &str) -> StorageResult<bool> {
            Ok(self.puts.lock().iter().any(|(k, _)| k == key))
        }

        async fn put(&self, key: &str, _body: &PutBody, headers: &Headers) -> StorageResult<()> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(StorageError::http(format!("reset #{n}")));
            }
            self.puts.lock().push((key.to_string(), headers.clone()));
            Ok(())
        }
    }

    /// Never answers.
    struct HangingStore;

    #[async_trait]
    impl ObjectStore for HangingStore {
        async fn head(&self, _key: &str) -> StorageResult<bool> {
            std::future::pending().await
        }

        async fn put(&self, _key: &str, _body: &PutBody, _headers: &Headers) -> StorageResult<()> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_public_url_direct_and_cdn() {
        let config = StorageConfig {
            bucket: "assets".into(),
            ..Default::default()
        };
        let client = StorageClient::from_config(&config).unwrap();
        assert_eq!(
            client.public_url("/js//abc.js"),
            "https://s3.amazonaws.com/assets/js/abc.js"
        );

        let config = StorageConfig {
            bucket: "assets".into(),
            cdn_domain: Some("cdn.example.com".into()),
            ..Default::default()
        };
        let client = StorageClient::from_config(&config).unwrap();
        assert_eq!(client.public_url("js/abc.js"), "https://cdn.example.com/js/abc.js");
        assert_eq!(cdn_base("http://cdn.local/"), "http://cdn.local");
    }

    #[test]
    fn test_default_headers() {
        let client = StorageClient::new(Arc::new(FlakyStore::default()), "https://x");
        let headers = client.default_headers("extras/font.ttf");
        assert_eq!(headers.get(ACL_HEADER), Some("public-read"));
        assert_eq!(headers.get(CONTENT_TYPE), Some(mime::types::OPENTYPE));

        let client = client.with_private(true);
        let headers = client.default_headers("images/a.svg");
        assert_eq!(headers.get(ACL_HEADER), None);
        assert_eq!(headers.get(CONTENT_TYPE), Some(mime::types::SVG));
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_retries_then_succeeds() {
        let store = Arc::new(FlakyStore {
            failures: 2,
            ..Default::default()
        });
        let client = StorageClient::new(store.clone(), "https://cdn.example.com");
        let start = tokio::time::Instant::now();

        let url = client.put_buffer("a{}", "/css/abc.css", None).await.unwrap();
        assert_eq!(url, "https://cdn.example.com/css/abc.css");
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(300));

        let puts = store.puts.lock();
        assert_eq!(puts[0].0, "css/abc.css");
        assert_eq!(puts[0].1.get(CONTENT_TYPE), Some(mime::types::CSS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_surfaces_last_error() {
        let store = Arc::new(FlakyStore {
            failures: u32::MAX,
            ..Default::default()
        });
        let client = StorageClient::new(store.clone(), "https://x");

        let err = client.put_buffer("x", "k", None).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP request failed: reset #3");
        assert_eq!(store.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_extra_headers_override() {
        let store = Arc::new(FlakyStore::default());
        let client = StorageClient::new(store.clone(), "https://x");
        let extra: Headers = [(CONTENT_TYPE, "text/plain")].into_iter().collect();

        client.put_buffer("x", "images/abc.txt", Some(extra)).await.unwrap();
        assert_eq!(store.puts.lock()[0].1.get(CONTENT_TYPE), Some("text/plain"));
        assert!(client.exists("images/abc.txt").await.unwrap());
        assert!(!client.exists("images/other.txt").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_applies_per_attempt() {
        let client = StorageClient::new(Arc::new(HangingStore), "https://x")
            .with_timeout(Some(Duration::from_secs(2)))
            .with_retry(RetryPolicy::none());

        let err = client.exists("js/a.js").await.unwrap_err();
        assert!(matches!(err, StorageError::Timeout(_)));
        let err = client.put_buffer("x", "js/a.js", None).await.unwrap_err();
        assert!(matches!(err, StorageError::Timeout(_)));
    }

    #[test]
    fn test_retry_policy_from_config() {
        let config = StorageConfig {
            bucket: "assets".into(),
            max_retries: 5,
            ..Default::default()
        };
        let client = StorageClient::from_config(&config).unwrap();
        assert_eq!(client.retry.max_retries, 5);
        assert!(!client.retry.fail_fast);

        let config = StorageConfig {
            bucket: "assets".into(),
            fail_fast: true,
            ..Default::default()
        };
        assert!(StorageClient::from_config(&config).unwrap().retry.fail_fast);
    }

    #[tokio::test]
    async fn test_local_provider_roundtrip() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("logo.png");
        std::fs::write(&source, b"png").unwrap();
        let config = StorageConfig {
            provider: StorageProvider::Local,
            local_dir: Some(dir.path().join("bucket")),
            cdn_domain: Some("cdn.example.com".into()),
            ..Default::default()
        };
        let client = StorageClient::from_config(&config).unwrap();

        assert!(!client.exists("images/logo.png").await.unwrap());
        let url = client
            .put_file(&source, "images/logo.png", None)
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example.com/images/logo.png");
        assert!(client.exists("images/logo.png").await.unwrap());
    }
}
