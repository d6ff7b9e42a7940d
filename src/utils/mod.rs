//! Shared helpers: process execution, MIME detection, path handling.

pub mod exec;
pub mod mime;
pub mod path;
