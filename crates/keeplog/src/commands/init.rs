//! Initialize command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Args;
use keeplog_config::{CONFIG_FILE_NAME, Config};
use tracing::info;

/// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,
}

/// Runs the init command.
pub fn run(args: &InitArgs, config_path: Option<&Path>) -> Result<()> {
    let path = config_path.unwrap_or_else(|| Path::new(CONFIG_FILE_NAME));

    if path.exists() && !args.force {
        bail!(
            "{} already exists, use --force to overwrite it",
            path.display()
        );
    }

    let content = Config::default()
        .to_toml()
        .context("failed to render default configuration")?;
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), "configuration written");
    println!("Created {}", path.display());
    Ok(())
}
