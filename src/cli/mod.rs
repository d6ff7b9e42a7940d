//! Command-line interface module.

mod args;
mod observer;

pub use args::{Cli, Commands};
pub use observer::LogObserver;

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{AssetConfig, find_config_file};
use crate::log;
use crate::processor::{AssetManifest, AssetProcessor, EnsureOptions};
use crate::storage::StorageClient;

/// Dispatch a parsed command line.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(&cli.config)?;
    let processor = AssetProcessor::new(config)?.with_observer(Arc::new(LogObserver::new(cli.json)));

    match &cli.command {
        Commands::Files { class, absolute } => {
            let files = processor.files(*class, *absolute)?;
            if cli.json {
                println!("{}", serde_json::to_string(&files)?);
            } else {
                for file in files {
                    println!("{file}");
                }
            }
        }
        Commands::Publish { force, output } => {
            processor.config().validate_storage()?;
            let storage = StorageClient::from_config(&processor.config().storage)
                .context("failed to set up storage")?;
            let manifest = processor
                .with_storage(storage)
                .ensure_assets(EnsureOptions { force: *force })
                .await?;
            write_manifest(&manifest, output.as_deref(), cli.json)?;
        }
        Commands::Build { output } => {
            let manifest = processor.process_assets()?;
            write_manifest(&manifest, output.as_deref(), cli.json)?;
        }
        Commands::Less => {
            let written = processor.compile_less_files()?;
            log!("less"; "compiled {} file(s)", written.len());
        }
        Commands::Import => {
            let written = processor.import_latest_stylesheets().await?;
            log!("import"; "imported {} file(s)", written.len());
        }
    }

    Ok(())
}

/// Locate `name` upward from the current directory and load it.
fn load_config(name: &Path) -> Result<AssetConfig> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let path = find_config_file(name, &cwd).unwrap_or_else(|| name.to_path_buf());
    AssetConfig::load(&path).with_context(|| format!("failed to load {}", path.display()))
}

/// Print the `{class: url}` manifest, or write it to `output`.
fn write_manifest(manifest: &AssetManifest, output: Option<&Path>, compact: bool) -> Result<()> {
    let urls = manifest.urls();
    let formatted = if compact {
        serde_json::to_string(&urls)?
    } else {
        serde_json::to_string_pretty(&urls)?
    };

    if let Some(path) = output {
        let mut file =
            fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        writeln!(file, "{formatted}")?;
        log!("publish"; "wrote manifest to {}", path.display());
    } else {
        println!("{formatted}");
    }
    Ok(())
}
