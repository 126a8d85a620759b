//! merge-bot - merge pull requests once CI passes

mod cli;

use clap::{Parser, Subcommand};
use cli::{StartOptions, StatusOptions, run_start, run_status};
use merge_bot::types::BumpVersion;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "merge-bot")]
#[command(about = "Merge pull requests once CI passes on a rebased merge branch")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebase a PR onto its target and push a merge bot branch
    Start {
        /// Repository owner
        #[arg(long)]
        org: String,
        /// Repository name
        #[arg(long)]
        repo: String,
        /// Pull request number
        #[arg(long)]
        pr: u64,
        /// User who issued the merge command
        #[arg(long = "user")]
        username: String,
        /// Bump the version of modified addons (patch, minor or major)
        #[arg(long)]
        bump: Option<BumpVersion>,
        /// Simulate pushes to the target branch
        #[arg(long)]
        dry_run: bool,
        /// Custom opener for the progress comment
        #[arg(long)]
        message: Option<String>,
    },

    /// Handle a CI status event for a merge bot branch
    Status {
        /// Repository owner
        #[arg(long)]
        org: String,
        /// Repository name
        #[arg(long)]
        repo: String,
        /// Merge bot branch the event refers to
        #[arg(long)]
        branch: String,
        /// Commit SHA the event refers to
        #[arg(long)]
        sha: String,
        /// Simulate the push to the target branch and the merged label
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Start {
            org,
            repo,
            pr,
            username,
            bump,
            dry_run,
            message,
        } => {
            run_start(
                config,
                StartOptions {
                    org,
                    repo,
                    pr,
                    username,
                    bump,
                    dry_run,
                    message,
                },
            )
            .await?;
        }
        Commands::Status {
            org,
            repo,
            branch,
            sha,
            dry_run,
        } => {
            run_status(
                config,
                StatusOptions {
                    org,
                    repo,
                    branch,
                    sha,
                    dry_run,
                },
            )
            .await?;
        }
    }

    Ok(())
}
