//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fireproof static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a site directory into an output directory
    Build {
        /// Site directory: content, `templates/` and an optional `.fireproof`
        site_dir: PathBuf,

        /// Where the rendered site is written; must be empty unless `--force`
        output_dir: PathBuf,

        /// Write into a non-empty output directory, overwriting files
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["fireproof", "build", "site", "out"]).unwrap();
        let Commands::Build {
            site_dir,
            output_dir,
            force,
        } = cli.command;
        assert_eq!(site_dir, PathBuf::from("site"));
        assert_eq!(output_dir, PathBuf::from("out"));
        assert!(!force);
    }

    #[test]
    fn test_parse_force() {
        let cli = Cli::try_parse_from(["fireproof", "build", "-f", "site", "out"]).unwrap();
        assert!(matches!(cli.command, Commands::Build { force: true, .. }));
    }

    #[test]
    fn test_output_dir_required() {
        assert!(Cli::try_parse_from(["fireproof", "build", "site"]).is_err());
    }
}
