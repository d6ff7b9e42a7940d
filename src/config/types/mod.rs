//! Configuration utility types.
//!
//! | Module   | Purpose                                      |
//! |----------|----------------------------------------------|
//! | `error`  | Configuration error types and diagnostics    |

mod error;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
