//! `process_assets`: local preview build.
//!
//! JS and CSS are always rebuilt, ignoring remote state, and written under
//! the output directory at the same `{folder}/{fp}.{ext}` path a publish
//! would use. Images and extras have no local artifact.

use std::fs;
use std::path::Path;

use super::publish::fingerprint_files;
use super::{AssetError, AssetManifest, AssetProcessor, PublishResult};
use crate::asset::AssetClass;
use crate::freshness::ContentHash;
use crate::log;

impl AssetProcessor {
    /// Build JS and CSS bundles into [`output_dir`](crate::config::AssetConfig::output_dir).
    ///
    /// Returned URLs are site-absolute (`/js/{fp}.js`).
    pub fn process_assets(&self) -> Result<AssetManifest, AssetError> {
        let output = self.config.output_dir();
        let mut manifest = AssetManifest::default();

        let js = self.select(AssetClass::Javascripts)?;
        if !js.is_empty() {
            let files = js.absolute();
            let fingerprint = fingerprint_files(AssetClass::Javascripts, &files)?;
            let key = self.bundle_key(AssetClass::Javascripts, &fingerprint);
            let bundle = self.bundler().bundle_js(&files)?;

            let mut code = bundle.code;
            if let Some(map) = bundle.map {
                code.push_str(&format!("\n//# sourceMappingURL={fingerprint}.js.map"));
                write_output(&output, &format!("{key}.map"), map.as_bytes())?;
            }
            write_output(&output, &key, code.as_bytes())?;
            manifest.set(AssetClass::Javascripts, Some(local_result(&key)));
        }

        let css = self.select(AssetClass::Stylesheets)?;
        if !css.is_empty() {
            let files = css.absolute();
            let bundler = self.bundler();
            let fingerprint = ContentHash::of_bytes(bundler.rebased_css(&files)?).to_hex();
            let key = self.bundle_key(AssetClass::Stylesheets, &fingerprint);
            let text = bundler.bundle_css(&files)?;

            write_output(&output, &key, text.as_bytes())?;
            manifest.set(AssetClass::Stylesheets, Some(local_result(&key)));
        }

        Ok(manifest)
    }
}

fn local_result(key: &str) -> PublishResult {
    PublishResult {
        url: format!("/{key}"),
        changed: true,
    }
}

fn write_output(output: &Path, key: &str, content: &[u8]) -> Result<(), AssetError> {
    let path = output.join(key);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| AssetError::Io(parent.to_path_buf(), err))?;
    }
    fs::write(&path, content).map_err(|err| AssetError::Io(path.clone(), err))?;
    log!("build"; "{}", key);
    Ok(())
}
