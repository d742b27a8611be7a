//! Release command.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use keeplog_core::{Clock, Manipulator, SystemClock};

use super::{Changelog, load, open_provider, parse_day};

/// Arguments for the release command.
#[derive(Debug, Args)]
pub struct ReleaseArgs {
    /// Name of the new release
    pub name: String,

    /// Release day (default: today)
    #[arg(short, long, value_parser = parse_day)]
    pub date: Option<NaiveDate>,

    /// Changelog file (default: from configuration)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Read and commit the changelog through the repository provider
    #[arg(long)]
    pub commit: bool,
}

/// Runs the release command.
pub fn run(args: &ReleaseArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load(config_path)?;
    if let Some(output) = &args.output {
        config.changelog.output.clone_from(output);
    }

    let provider = open_provider(&config)?;
    let format = config.changelog.format();
    let changelog = Changelog::open(
        &config.changelog.output,
        format,
        provider.as_ref(),
        args.commit,
    )?;

    let day = args.date.unwrap_or_else(|| SystemClock.today());
    let releases = Manipulator::new()
        .release(changelog.source(day).as_ref(), &args.name, day)
        .with_context(|| format!("failed to release {}", args.name))?
        .sort();

    let rendered = format.renderer().render_releases(&releases);
    changelog.save(&rendered, provider.as_ref(), &config)?;

    println!("Released {} ({day})", args.name);
    Ok(())
}
