//! Generate command.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use keeplog_change::Commit;
use keeplog_core::{Manipulator, Pipeline, PipelineRequest, ScopeInputs, TransformOptions};
use keeplog_format::Format;
use tracing::{debug, info};

use super::{Changelog, load, open_provider, parse_since, parse_until};

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown document
    Markdown,
    /// HTML document
    Html,
    /// The analyzed release as JSON
    Json,
}

/// Arguments for the generate command.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Describe the release of this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Compare against this tag instead of the next older one
    #[arg(long)]
    pub tag_next: Option<String>,

    /// Newest commit of the range
    #[arg(long)]
    pub commit_start: Option<String>,

    /// Excluded oldest commit of the range
    #[arg(long)]
    pub commit_end: Option<String>,

    /// Branch to start from when no start is given
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Swap the start and end of the range
    #[arg(long)]
    pub compare_reverse: bool,

    /// Use commits only, never pull requests
    #[arg(long, conflicts_with = "only_pull_requests")]
    pub only_commits: bool,

    /// Use pull requests only
    #[arg(long)]
    pub only_pull_requests: bool,

    /// Leave out changes by this author (repeatable)
    #[arg(long = "skip-from", value_name = "AUTHOR")]
    pub skip_from: Vec<String>,

    /// Drop commits before this day or instant
    #[arg(long, value_parser = parse_since)]
    pub since: Option<DateTime<Utc>>,

    /// Drop commits after this day or instant
    #[arg(long, value_parser = parse_until)]
    pub until: Option<DateTime<Utc>>,

    /// Output format (default: from configuration)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Merge the release into the changelog file instead of printing it
    #[arg(short, long)]
    pub update: bool,

    /// Changelog file (default: from configuration)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Read and commit the changelog through the repository provider
    #[arg(long, requires = "update")]
    pub commit: bool,
}

/// Runs the generate command.
pub fn run(args: &GenerateArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load(config_path)?;
    if let Some(output) = &args.output {
        config.changelog.output.clone_from(output);
    }

    let format = match args.format {
        Some(OutputFormat::Json) if args.update => {
            bail!("--update writes the changelog file and cannot be used with --format json")
        }
        Some(OutputFormat::Json) => None,
        Some(OutputFormat::Markdown) => Some(Format::Markdown),
        Some(OutputFormat::Html) => Some(Format::Html),
        None => Some(config.changelog.format()),
    };

    let skip_authors = config.sources.skip_authors.iter().chain(&args.skip_from);
    let request = PipelineRequest {
        scope: ScopeInputs {
            tag: args.tag.clone(),
            tag_next: args.tag_next.clone(),
            commit_start: args.commit_start.clone(),
            commit_end: args.commit_end.clone(),
            branch: args
                .branch
                .clone()
                .or_else(|| config.repository.default_branch.clone()),
            compare_reverse: args.compare_reverse || config.sources.compare_reverse,
        },
        sources: TransformOptions::new(
            args.only_commits || config.sources.only_commits,
            args.only_pull_requests || config.sources.only_pull_requests,
            skip_authors,
        )
        .context("invalid source options")?,
        since: args.since,
        until: args.until,
    };

    let pipeline = Pipeline::new(open_provider(&config)?);
    let analysis = pipeline
        .run_with_progress(&request, &mut |commit: &Commit| {
            debug!(sha = %commit.short_sha(), subject = commit.subject(), "processed commit");
        })
        .context("failed to generate changelog")?;
    let release = analysis.release;

    let Some(format) = format else {
        println!(
            "{}",
            serde_json::to_string_pretty(&release).context("failed to serialize release")?
        );
        return Ok(());
    };

    if !args.update {
        print!("{}", format.renderer().render_release(&release));
        return Ok(());
    }

    let changelog = Changelog::open(
        &config.changelog.output,
        format,
        pipeline.provider(),
        args.commit,
    )?;
    let releases = Manipulator::new()
        .update(changelog.source(release.day()).as_ref(), release)
        .with_context(|| format!("failed to merge into {}", config.changelog.output))?
        .sort();

    let rendered = format.renderer().render_releases(&releases);
    if changelog.save(&rendered, pipeline.provider(), &config)? {
        println!("Updated {}", config.changelog.output);
    } else {
        info!("nothing changed");
        println!("{} is up to date", config.changelog.output);
    }
    Ok(())
}
