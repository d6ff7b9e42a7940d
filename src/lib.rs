//! assetpush - select, bundle, fingerprint and publish static assets.
//!
//! The library half holds the pipeline; `main.rs` is a thin CLI over
//! [`processor::AssetProcessor`].

#[macro_use]
pub mod logger;

pub mod asset;
pub mod cli;
pub mod config;
pub mod freshness;
pub mod import;
pub mod processor;
pub mod storage;
pub mod utils;

pub use processor::{AssetManifest, AssetProcessor, EnsureOptions};
