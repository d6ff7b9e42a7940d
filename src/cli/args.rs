//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::asset::AssetClass;

/// Select, bundle, fingerprint and publish static assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "assets.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Print lifecycle events and results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the selected files of one asset class
    #[command(visible_alias = "f")]
    Files {
        /// javascripts, stylesheets, images or extras
        class: AssetClass,

        /// Print absolute paths instead of root-relative ones
        #[arg(short, long)]
        absolute: bool,
    },

    /// Publish changed assets to storage
    #[command(visible_alias = "p")]
    Publish {
        /// Republish even when the remote targets already exist
        #[arg(short, long)]
        force: bool,

        /// Write the URL manifest to a file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Build JS and CSS bundles into the local output directory
    #[command(visible_alias = "b")]
    Build {
        /// Write the URL manifest to a file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Compile .less files to sibling .css files
    #[command(visible_alias = "l")]
    Less,

    /// Fetch the configured external stylesheets
    #[command(visible_alias = "i")]
    Import,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_files() {
        let cli = Cli::try_parse_from(["assetpush", "files", "Stylesheets", "--absolute"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Files {
                class: AssetClass::Stylesheets,
                absolute: true
            }
        ));
        assert_eq!(cli.config, PathBuf::from("assets.toml"));
    }

    #[test]
    fn test_parse_publish_with_globals() {
        let cli = Cli::try_parse_from([
            "assetpush", "publish", "--force", "-o", "manifest.json", "-C", "cfg/assets.toml",
            "--json",
        ])
        .unwrap();
        let Commands::Publish { force, output } = cli.command else {
            panic!("expected publish");
        };
        assert!(force);
        assert_eq!(output, Some(PathBuf::from("manifest.json")));
        assert_eq!(cli.config, PathBuf::from("cfg/assets.toml"));
        assert!(cli.json);
    }

    #[test]
    fn test_verbose_and_version_flags_coexist() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from(["assetpush", "-v", "less"]).unwrap();
        assert!(cli.verbose);
        let cli = Cli::try_parse_from(["assetpush", "import", "--verbose"]).unwrap();
        assert!(cli.verbose);

        let err = Cli::try_parse_from(["assetpush", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_unknown_class_rejected() {
        assert!(Cli::try_parse_from(["assetpush", "files", "fonts"]).is_err());
    }
}
