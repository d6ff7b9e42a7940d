//! Object store transports.
//!
//! [`ObjectStore`] is the wire-level seam: a metadata check and a put.
//! Retry, timeouts and URL mapping live in [`super::StorageClient`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, StatusCode};
use tokio_util::io::ReaderStream;
use url::Url;

use super::{StorageError, StorageResult};

// ============================================================================
// Headers
// ============================================================================

/// Object headers (`content-type`, `x-amz-acl`, ...), sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    inner: BTreeMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.inner.insert(key.into().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(mut self, other: Headers) -> Self {
        self.inner.extend(other.inner);
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

// ============================================================================
// ObjectStore
// ============================================================================

/// Body of a put. Files are reopened on every attempt and streamed.
#[derive(Clone, Debug)]
pub enum PutBody {
    Bytes(Bytes),
    File(PathBuf),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Metadata-only existence check.
    async fn head(&self, key: &str) -> StorageResult<bool>;

    /// Store `body` under `key`, replacing any previous object.
    async fn put(&self, key: &str, body: &PutBody, headers: &Headers) -> StorageResult<()>;
}

// ============================================================================
// HTTP transport
// ============================================================================

/// Characters escaped in key segments.
const KEY_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// S3-compatible store addressed path-style: `{endpoint}/{bucket}/{key}`.
#[derive(Clone, Debug)]
pub struct HttpObjectStore {
    client: Client,
    endpoint: Url,
    bucket: String,
    token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(
        endpoint: &str,
        bucket: impl Into<String>,
        token: Option<String>,
    ) -> StorageResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|err| StorageError::InvalidEndpoint(format!("{endpoint}: {err}")))?;
        let client = Client::builder()
            .user_agent(concat!("assetpush/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            bucket: bucket.into(),
            token,
        })
    }

    /// Request URL for `key`.
    pub fn object_url(&self, key: &str) -> String {
        let encoded = key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, KEY_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            self.bucket,
            encoded
        )
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn head(&self, key: &str) -> StorageResult<bool> {
        let req = self.authorize(self.client.head(self.object_url(key)));
        let resp = req.send().await?;
        match resp.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(StorageError::http_status(status.as_u16(), key)),
        }
    }

    async fn put(&self, key: &str, body: &PutBody, headers: &Headers) -> StorageResult<()> {
        let mut req = self.authorize(self.client.put(self.object_url(key)));
        for (name, value) in headers.iter() {
            req = req.header(name, value);
        }

        req = match body {
            PutBody::Bytes(bytes) => req.body(bytes.clone()),
            PutBody::File(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|err| StorageError::Io(path.clone(), err))?;
                let len = file
                    .metadata()
                    .await
                    .map_err(|err| StorageError::Io(path.clone(), err))?
                    .len();
                req.header(CONTENT_LENGTH, len)
                    .body(Body::wrap_stream(ReaderStream::new(file)))
            }
        };

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StorageError::http_status(status.as_u16(), key));
        }
        Ok(())
    }
}
