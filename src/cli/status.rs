//! Status command - handle a CI event on a merge bot branch

use crate::cli::context::CommandContext;
use merge_bot::error::Result;
use merge_bot::merge::{FinalizeOutcome, StatusOutcome};
use merge_bot::types::ExecutionMode;
use std::path::Path;

/// Options for the status command
#[derive(Debug, Clone)]
pub struct StatusOptions {
    /// Repository owner
    pub org: String,
    /// Repository name
    pub repo: String,
    /// Merge bot branch the event is for
    pub branch: String,
    /// Commit the event is for
    pub sha: String,
    /// Log the target branch push and label instead of performing them
    pub dry_run: bool,
}

/// Run the status command
#[allow(clippy::future_not_send)]
pub async fn run_status(config_path: Option<&Path>, options: StatusOptions) -> Result<()> {
    let ctx = CommandContext::new(config_path, &options.org, &options.repo)?;
    let mode = ExecutionMode::from_dry_run(options.dry_run);

    match ctx.bot().status(&options.branch, &options.sha, mode).await? {
        StatusOutcome::Disabled => println!("merge bot is disabled"),
        StatusOutcome::Stale => println!("stale event ignored"),
        StatusOutcome::Pending => println!("checks in progress"),
        StatusOutcome::Aborted => println!("checks failed, merge aborted"),
        StatusOutcome::Finalized(FinalizeOutcome::Merged { sha }) => println!("merged at {sha}"),
        StatusOutcome::Finalized(FinalizeOutcome::Restarted { branch }) => {
            println!("target moved, restarted as {branch}");
        }
        StatusOutcome::Finalized(FinalizeOutcome::NotMerged) => println!("not merged"),
    }
    Ok(())
}
