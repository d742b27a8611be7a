//! CLI definition.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Generate and maintain changelogs from Git history and pull requests.
#[derive(Debug, Parser)]
#[command(name = "keeplog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: keeplog.toml in this or a parent directory)
    #[arg(short, long, global = true, env = "KEEPLOG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default keeplog.toml
    Init(commands::init::InitArgs),

    /// Generate the changelog of a release
    Generate(commands::generate::GenerateArgs),

    /// Promote the unreleased changes to a named release
    Release(commands::release::ReleaseArgs),
}

impl Cli {
    /// Runs the CLI command.
    pub fn run(self) -> Result<()> {
        let config = self.config.as_deref();
        match self.command {
            Commands::Init(args) => commands::init::run(&args, config),
            Commands::Generate(args) => commands::generate::run(&args, config),
            Commands::Release(args) => commands::release::run(&args, config),
        }
    }
}
