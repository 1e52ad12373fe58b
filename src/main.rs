//! Fireproof - a static site generator for markdown and templates.

mod build;
mod cli;
mod config;
mod error;
mod logger;
mod page;
mod render;
mod site;
mod utils;

use anyhow::Result;
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Build {
            site_dir,
            output_dir,
            force,
        } => build_site(site_dir, output_dir, *force),
    }
}
