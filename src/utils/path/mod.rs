//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `lexical_normalize`, `to_posix`)
//! - [`route`]: URL helpers (`is_external_url`, `split_path_suffix`, `normalize_key`)

pub mod fs;
pub mod route;

pub use fs::{lexical_normalize, normalize_entry, normalize_path, relative_posix, to_posix};
pub use route::{is_external_url, normalize_key, split_path_suffix};
