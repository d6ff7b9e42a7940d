//! `ensure_assets`: check → decide → upload → report, one class at a time.
//!
//! | Class       | Fingerprint input          | Checked key             |
//! |-------------|----------------------------|-------------------------|
//! | javascripts | selected files             | `{folder}/{fp}.js`      |
//! | stylesheets | rebased sources            | `{folder}/{fp}.css`     |
//! | images      | selected files             | `{folder}/{fp}.txt`     |
//! | extras      | selected files             | `{folder}/{fp}.txt`     |
//!
//! The checked key is always uploaded last, so an interrupted publish is
//! retried in full on the next run.

use bytes::Bytes;

use super::{AssetError, AssetEvent, AssetManifest, AssetProcessor, PublishResult};
use crate::asset::{AssetClass, Bundler, FileSelection};
use crate::freshness::{ContentHash, hash_files};
use crate::storage::StorageClient;
use crate::{debug, log};

/// Per-call options for [`AssetProcessor::ensure_assets`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnsureOptions {
    /// Republish even when the remote target already exists.
    pub force: bool,
}

impl AssetProcessor {
    /// Publish every class whose fingerprint is not yet in storage.
    ///
    /// Classes run sequentially. The first error aborts the remaining
    /// classes; uploads already made stay in storage.
    pub async fn ensure_assets(&self, options: EnsureOptions) -> Result<AssetManifest, AssetError> {
        let storage = self.storage()?;
        let mut manifest = AssetManifest::default();

        for class in AssetClass::ALL {
            let result = self.ensure_class(storage, class, options).await?;
            if let Some(result) = &result {
                debug!("publish"; "{}: {} (changed: {})", class, result.url, result.changed);
            }
            manifest.set(class, result);
        }

        if manifest.any_changed() {
            log!("publish"; "done");
        }
        Ok(manifest)
    }

    async fn ensure_class(
        &self,
        storage: &StorageClient,
        class: AssetClass,
        options: EnsureOptions,
    ) -> Result<Option<PublishResult>, AssetError> {
        let selection = self.select(class)?;
        if selection.is_empty() {
            return Ok(None);
        }

        let result = match class {
            AssetClass::Javascripts => self.ensure_js(storage, &selection, options.force).await?,
            AssetClass::Stylesheets => self.ensure_css(storage, &selection, options.force).await?,
            AssetClass::Images | AssetClass::Extras => {
                let force = options.force && self.config.publish.force_marker_classes;
                self.ensure_marked(storage, class, &selection, force).await?
            }
        };
        Ok(Some(result))
    }

    // ========================================================================
    // bundled classes
    // ========================================================================

    async fn ensure_js(
        &self,
        storage: &StorageClient,
        selection: &FileSelection,
        force: bool,
    ) -> Result<PublishResult, AssetError> {
        let class = AssetClass::Javascripts;
        let files = selection.absolute();
        let fingerprint = fingerprint_files(class, &files)?;
        let key = self.bundle_key(class, &fingerprint);

        let changed = self.check_target(storage, class, &key).await?;
        if !(changed || force) {
            return Ok(PublishResult {
                url: storage.public_url(&key),
                changed,
            });
        }

        let bundle = self.bundler().bundle_js(&files)?;
        let map_name = format!("{fingerprint}.js.map");
        let mut code = bundle.code;

        if let Some(map) = bundle.map {
            code.push_str(&format!("\n//# sourceMappingURL={map_name}"));
            self.upload(storage, class, &format!("{key}.map"), map.into_bytes())
                .await?;
        }
        let url = self.upload(storage, class, &key, code.into_bytes()).await?;

        Ok(PublishResult { url, changed: true })
    }

    async fn ensure_css(
        &self,
        storage: &StorageClient,
        selection: &FileSelection,
        force: bool,
    ) -> Result<PublishResult, AssetError> {
        let class = AssetClass::Stylesheets;
        let files = selection.absolute();
        let bundler = self.bundler();
        let fingerprint = ContentHash::of_bytes(bundler.rebased_css(&files)?).to_hex();
        let key = self.bundle_key(class, &fingerprint);

        let changed = self.check_target(storage, class, &key).await?;
        if !(changed || force) {
            return Ok(PublishResult {
                url: storage.public_url(&key),
                changed,
            });
        }

        let css = bundler.bundle_css(&files)?;
        let url = self.upload(storage, class, &key, css.into_bytes()).await?;

        Ok(PublishResult { url, changed: true })
    }

    async fn upload(
        &self,
        storage: &StorageClient,
        class: AssetClass,
        key: &str,
        body: Vec<u8>,
    ) -> Result<String, AssetError> {
        let source = format!("{class} bundle");
        self.observer.notify(&AssetEvent::UploadStarted {
            kind: class,
            target: key.to_owned(),
            source: source.clone(),
        });
        let url = storage.put_buffer(Bytes::from(body), key, None).await?;
        self.observer.notify(&AssetEvent::UploadEnded {
            kind: class,
            target: key.to_owned(),
            source,
            url: url.clone(),
        });
        Ok(url)
    }

    // ========================================================================
    // marker classes
    // ========================================================================

    async fn ensure_marked(
        &self,
        storage: &StorageClient,
        class: AssetClass,
        selection: &FileSelection,
        force: bool,
    ) -> Result<PublishResult, AssetError> {
        let folder = self.config.class_folder(class);
        let fingerprint = fingerprint_files(class, &selection.absolute())?;
        let marker = format!("{folder}/{fingerprint}.txt");

        let changed = self.check_target(storage, class, &marker).await?;
        let url = storage.public_url(&folder);
        if !(changed || force) {
            return Ok(PublishResult { url, changed });
        }

        let sources = selection.relative();
        for (file, source) in selection.files().iter().zip(&sources) {
            let target = format!("{folder}/{}", file.rel);
            self.observer.notify(&AssetEvent::UploadStarted {
                kind: class,
                target: target.clone(),
                source: source.clone(),
            });
            let uploaded = storage.put_file(&file.abs, &target, None).await?;
            self.observer.notify(&AssetEvent::UploadEnded {
                kind: class,
                target,
                source: source.clone(),
                url: uploaded,
            });
        }

        storage
            .put_buffer(Bytes::from(sources.join("\n")), &marker, None)
            .await?;
        debug!("publish"; "marker {}", marker);

        Ok(PublishResult { url, changed: true })
    }

    // ========================================================================
    // helpers
    // ========================================================================

    /// Check `key` and report the decision. Returns `changed`.
    async fn check_target(
        &self,
        storage: &StorageClient,
        class: AssetClass,
        key: &str,
    ) -> Result<bool, AssetError> {
        let changed = !storage.exists(key).await?;
        self.observer
            .notify(&AssetEvent::FilesChecked { kind: class, changed });
        Ok(changed)
    }

    pub(super) fn bundler(&self) -> Bundler<'_> {
        Bundler::new(&self.config.root, self.observer.as_ref())
    }

    pub(super) fn bundle_key(&self, class: AssetClass, fingerprint: &str) -> String {
        let ext = class.bundle_extension().unwrap_or("txt");
        format!("{}/{fingerprint}.{ext}", self.config.class_folder(class))
    }
}

/// Hex fingerprint of a non-empty file list.
pub(super) fn fingerprint_files(
    class: AssetClass,
    files: &[std::path::PathBuf],
) -> Result<String, AssetError> {
    hash_files(files)
        .map_err(|err| AssetError::Fingerprint(class, err))?
        .map(ContentHash::to_hex)
        .ok_or_else(|| {
            AssetError::Fingerprint(
                class,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no files selected"),
            )
        })
}
