//! Change detection: content fingerprints (blake3) over ordered file lists.

mod hash;

pub use hash::{ContentHash, hash_files};
