//! assetpush - asset pipeline CLI.

use anyhow::{Context, Result};
use assetpush::cli::{self, Cli};
use assetpush::logger;
use clap::{ColorChoice, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);
    logger::set_quiet(cli.json);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    if let Err(err) = runtime.block_on(cli::run(&cli)) {
        assetpush::log!("error"; "{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
