use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use tag_bump::cli::{Driver, LevelSource, Resolution};
use tag_bump::config;
use tag_bump::domain::LevelSelector;
use tag_bump::git::{Git2Repository, Repository};
use tag_bump::platform::{GitHubClient, RepoSlug};
use tag_bump::ui;
use tag_bump::VersioningError;

/// Exit code for configuration problems
const EXIT_CONFIG_ERROR: i32 = 2;
/// Exit code for repository state problems (git, missing baseline tag, version overflow)
const EXIT_REPOSITORY_ERROR: i32 = 3;
/// Exit code for anything else
const EXIT_ERROR: i32 = 1;

#[derive(clap::Parser)]
#[command(
    name = "tag-bump",
    version,
    about = "Compute the next version tag from the branches of merged pull requests"
)]
struct Args {
    #[arg(short, long, env = "TAG_BUMP_CONFIG", help = "Configuration file (.json or .toml)")]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        env = "VERSION_TYPE",
        default_value = "auto",
        help = "Severity to apply: auto, patch, minor or major"
    )]
    level: LevelSelector,

    #[arg(
        long,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "Token for the GitHub API"
    )]
    token: Option<String>,

    #[arg(
        long,
        env = "GITHUB_REPOSITORY",
        help = "Repository to query as owner/repo (default: origin remote)"
    )]
    repository: Option<RepoSlug>,

    #[arg(long, env = "ACTION_PATH", hide = true)]
    action_path: Option<PathBuf>,

    #[arg(long, default_value = ".", help = "Path inside the git repository")]
    repo_path: PathBuf,

    #[arg(long, help = "Print the severity (patch/minor/major/none) instead of the version")]
    print_level: bool,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    match resolve(&args) {
        Ok(resolution) => {
            ui::write_resolution(&mut std::io::stdout().lock(), &resolution, args.print_level)
                .context("Failed to write result to stdout")?;
            Ok(())
        }
        Err(err) => {
            ui::display_error(&err.to_string());
            if let VersioningError::NoBaselineTag { .. } = err {
                ui::display_hint("create an initial tag matching tag_format, e.g. `git tag v0.1.0`");
            }
            std::process::exit(exit_code(&err));
        }
    }
}

fn resolve(args: &Args) -> tag_bump::Result<Resolution> {
    let config = config::load_config(args.config.as_deref(), args.action_path.as_deref())?;
    let repo = Git2Repository::open(&args.repo_path)?;
    let driver = Driver::new(config, repo)?;

    match args.level {
        LevelSelector::Fixed(level) => driver.run(LevelSource::Fixed(level)),
        LevelSelector::Auto => {
            let client = github_client(args, &driver)?;
            driver.run(LevelSource::Auto(&client))
        }
    }
}

fn github_client(args: &Args, driver: &Driver<Git2Repository>) -> tag_bump::Result<GitHubClient> {
    let github = &driver.config().github;
    let remote_url = driver.repository().remote_url("origin")?;
    let slug = RepoSlug::resolve(
        args.repository.as_ref(),
        github.repository.as_deref(),
        remote_url.as_deref(),
    )?;

    if args.token.is_none() {
        tracing::warn!("no GitHub token supplied; requests are unauthenticated and rate limited");
    }

    GitHubClient::new(
        github.api_url.as_str(),
        slug,
        args.token.as_deref(),
        Duration::from_secs(github.timeout_secs),
    )
}

fn exit_code(err: &VersioningError) -> i32 {
    if err.is_config_error() {
        return EXIT_CONFIG_ERROR;
    }
    match err {
        VersioningError::NoBaselineTag { .. }
        | VersioningError::TemplateMismatch { .. }
        | VersioningError::VersionOverflow { .. }
        | VersioningError::Repository(_)
        | VersioningError::Git(_) => EXIT_REPOSITORY_ERROR,
        _ => EXIT_ERROR,
    }
}

/// Console logging on stderr, controlled by RUST_LOG or `-v`
fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .try_init()
        .context("Failed to initialise logging")
}
