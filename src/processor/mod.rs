//! Asset orchestration.
//!
//! [`AssetProcessor`] owns an immutable [`AssetConfig`] and composes file
//! selection, bundling, fingerprinting and storage into four verbs:
//!
//! | Verb                          | Effect                                          |
//! |-------------------------------|-------------------------------------------------|
//! | [`ensure_assets`]             | publish changed classes to storage              |
//! | [`process_assets`]            | build JS/CSS bundles into the local tree        |
//! | [`compile_less_files`]        | render `.less` files to sibling `.css`          |
//! | [`import_latest_stylesheets`] | fetch external stylesheets and remap them       |
//!
//! [`ensure_assets`]: AssetProcessor::ensure_assets
//! [`process_assets`]: AssetProcessor::process_assets
//! [`compile_less_files`]: AssetProcessor::compile_less_files
//! [`import_latest_stylesheets`]: AssetProcessor::import_latest_stylesheets

mod build;
mod error;
mod events;
mod manifest;
mod publish;


pub use error::AssetError;
pub use events::{AssetEvent, AssetObserver, NoopObserver};
pub use manifest::{AssetManifest, PublishResult};
pub use publish::EnsureOptions;

#[cfg(test)]
pub(crate) use events::RecordingObserver;

use std::path::PathBuf;
use std::sync::Arc;

use crate::asset::{
    AssetClass, CommandLessRenderer, FileSelection, LessRenderer, PathMatcher, compile_less,
};
use crate::config::{AssetConfig, ClassConfig, StorageProvider};
use crate::import::{GitImporter, GithubContentSource, ImportFailure, RawContentSource};
use crate::storage::StorageClient;

pub struct AssetProcessor {
    config: AssetConfig,
    storage: Option<StorageClient>,
    observer: Arc<dyn AssetObserver>,
    less: Box<dyn LessRenderer>,
    content_source: Option<Box<dyn RawContentSource>>,
}

impl AssetProcessor {
    /// Validate the configuration and build a processor with default collaborators.
    pub fn new(config: AssetConfig) -> Result<Self, AssetError> {
        config.validate()?;
        let less = CommandLessRenderer::new(config.stylesheets.less_command.clone());
        Ok(Self {
            config,
            storage: None,
            observer: Arc::new(NoopObserver),
            less: Box::new(less),
            content_source: None,
        })
    }

    pub fn with_storage(mut self, storage: StorageClient) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn AssetObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_less_renderer(mut self, renderer: Box<dyn LessRenderer>) -> Self {
        self.less = renderer;
        self
    }

    pub fn with_content_source(mut self, source: Box<dyn RawContentSource>) -> Self {
        self.content_source = Some(source);
        self
    }

    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    // ========================================================================
    // file listings
    // ========================================================================

    /// Select a class's files with the configured rules.
    pub fn select(&self, class: AssetClass) -> Result<FileSelection, AssetError> {
        self.select_with(class, self.config.class(class))
    }

    fn select_with(
        &self,
        class: AssetClass,
        rules: &ClassConfig,
    ) -> Result<FileSelection, AssetError> {
        let selection = PathMatcher::new(
            class,
            rules,
            self.config.class_root(class),
            &self.config.root,
        )
        .bypass_exclusions(self.config.selection.explicit_files_bypass_exclusions)
        .skip_dirs(self.generated_dirs())
        .select()?;
        Ok(selection)
    }

    /// Listing for `class`: absolute paths, or paths relative to the root.
    pub fn files(&self, class: AssetClass, absolute: bool) -> Result<Vec<String>, AssetError> {
        Ok(self.select(class)?.paths(absolute))
    }

    pub fn javascript_files(&self, absolute: bool) -> Result<Vec<String>, AssetError> {
        self.files(AssetClass::Javascripts, absolute)
    }

    pub fn css_files(&self, absolute: bool) -> Result<Vec<String>, AssetError> {
        self.files(AssetClass::Stylesheets, absolute)
    }

    pub fn image_files(&self, absolute: bool) -> Result<Vec<String>, AssetError> {
        self.files(AssetClass::Images, absolute)
    }

    pub fn extra_files(&self, absolute: bool) -> Result<Vec<String>, AssetError> {
        self.files(AssetClass::Extras, absolute)
    }

    // ========================================================================
    // verbs
    // ========================================================================

    /// Compile every `.less` file under the stylesheet roots. Stops at the
    /// first failure.
    pub fn compile_less_files(&self) -> Result<Vec<PathBuf>, AssetError> {
        let rules = self.config.stylesheets.class.with_extensions([".less"]);
        let files: Vec<PathBuf> = self
            .select_with(AssetClass::Stylesheets, &rules)?
            .absolute()
            .into_iter()
            .filter(|p| {
                p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("less"))
            })
            .collect();
        Ok(compile_less(self.less.as_ref(), &files)?)
    }

    /// Fetch every configured import into the stylesheets root, in order.
    pub async fn import_latest_stylesheets(&self) -> Result<Vec<PathBuf>, AssetError> {
        let imports = &self.config.stylesheets.import;
        if imports.is_empty() {
            return Ok(Vec::new());
        }

        let default_source;
        let source: &dyn RawContentSource = match &self.content_source {
            Some(source) => source.as_ref(),
            None => {
                default_source = GithubContentSource::new()
                    .map_err(|source| ImportFailure { succeeded: 0, source })?;
                &default_source
            }
        };

        let token = self
            .config
            .stylesheets
            .github_token_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|t| !t.is_empty());

        let written = GitImporter::new(source, self.config.class_root(AssetClass::Stylesheets))
            .with_token(token)
            .with_mappings(&self.config.stylesheets.mappings)
            .import_all(imports)
            .await?;
        Ok(written)
    }

    /// Trees this tool writes into: never selection input.
    fn generated_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.config.output_dir()];
        if self.config.storage.provider == StorageProvider::Local
            && let Some(dir) = &self.config.storage.local_dir
        {
            dirs.push(dir.clone());
        }
        dirs
    }

    fn storage(&self) -> Result<&StorageClient, AssetError> {
        self.storage.as_ref().ok_or(AssetError::NoStorage)
    }
}
