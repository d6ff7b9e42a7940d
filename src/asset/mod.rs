//! Asset selection, minification and bundling.
//!
//! Everything here works on local files only. Remote state lives in
//! [`crate::storage`] and the orchestration in [`crate::processor`].

mod bundle;
mod error;
mod kind;
pub mod less;
pub mod minify;
mod rebase;
mod scan;

pub use bundle::{Bundler, JsBundle};
pub use error::{CompileError, MinifyError, SelectError};
pub use kind::AssetClass;
pub use less::{CommandLessRenderer, LessRenderer, compile_less};
pub use rebase::CssUrlRebaser;
pub use scan::{FileSelection, PathMatcher, SelectedFile};
