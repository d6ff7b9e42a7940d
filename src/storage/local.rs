//! Directory-backed bucket.
//!
//! Mirrors keys as relative paths under a directory. Used for dry runs,
//! local mirrors and tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::transport::{Headers, ObjectStore, PutBody};
use super::{StorageError, StorageResult};

#[derive(Clone, Debug)]
pub struct LocalObjectStore {
    dir: PathBuf,
}

impl LocalObjectStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.dir.clone(), |path, segment| path.join(segment))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn head(&self, key: &str) -> StorageResult<bool> {
        let path = self.path_for(key);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|err| StorageError::Io(path, err))
    }

    async fn put(&self, key: &str, body: &PutBody, _headers: &Headers) -> StorageResult<()> {
        let target = self.path_for(key);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::Io(parent.to_path_buf(), err))?;
        }
        match body {
            PutBody::Bytes(bytes) => tokio::fs::write(&target, bytes)
                .await
                .map_err(|err| StorageError::Io(target.clone(), err)),
            PutBody::File(source) => tokio::fs::copy(source, &target)
                .await
                .map(|_| ())
                .map_err(|err| StorageError::Io(source.clone(), err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_then_head() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());

        assert!(!store.head("css/abc.css").await.unwrap());
        store
            .put("css/abc.css", &PutBody::Bytes(Bytes::from_static(b"a{}")), &Headers::new())
            .await
            .unwrap();
        assert!(store.head("css/abc.css").await.unwrap());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("css/abc.css")).unwrap(),
            "a{}"
        );
    }

    #[tokio::test]
    async fn test_put_file_copies() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("logo.png");
        std::fs::write(&source, b"png").unwrap();
        let store = LocalObjectStore::new(dir.path().join("bucket"));

        store
            .put("images/logo.png", &PutBody::File(source), &Headers::new())
            .await
            .unwrap();
        assert_eq!(
            std::fs::read(dir.path().join("bucket/images/logo.png")).unwrap(),
            b"png"
        );
    }

    #[tokio::test]
    async fn test_missing_source_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());
        let err = store
            .put("a", &PutBody::File(dir.path().join("gone")), &Headers::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(..)));
    }
}
