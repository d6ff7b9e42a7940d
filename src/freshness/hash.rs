//! Content fingerprints using blake3.
//!
//! A fingerprint covers an ordered file list: every file is streamed into a
//! single hasher in selection order, so reordering the list or touching any
//! byte yields a different fingerprint.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string (used in storage keys).
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Create from hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Hash an in-memory buffer (bundled CSS, marker bodies).
    pub fn of_bytes(data: impl AsRef<[u8]>) -> Self {
        Self(*blake3::hash(data.as_ref()).as_bytes())
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Fingerprint an ordered list of files.
///
/// Returns `Ok(None)` for an empty list: callers treat "no files" and
/// "no digest" alike, as nothing to publish.
pub fn hash_files<P: AsRef<Path>>(files: &[P]) -> io::Result<Option<ContentHash>> {
    if files.is_empty() {
        return Ok(None);
    }

    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; 64 * 1024];

    for path in files {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::with_capacity(64 * 1024, file);
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    Ok(Some(ContentHash::new(*hasher.finalize().as_bytes())))
}
