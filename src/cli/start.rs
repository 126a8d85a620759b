//! Start command - handle a merge command issued on a PR

use crate::cli::context::CommandContext;
use merge_bot::error::Result;
use merge_bot::merge::{StartOutcome, StartRequest};
use merge_bot::types::{BumpVersion, ExecutionMode};
use std::path::Path;

/// Options for the start command
#[derive(Debug, Clone)]
pub struct StartOptions {
    /// Repository owner
    pub org: String,
    /// Repository name
    pub repo: String,
    /// PR number
    pub pr: u64,
    /// User who issued the merge command
    pub username: String,
    /// Version bump for modified addons
    pub bump: Option<BumpVersion>,
    /// Simulate the push to the target branch on restart
    pub dry_run: bool,
    /// Custom progress comment opener
    pub message: Option<String>,
}

/// Run the start command
#[allow(clippy::future_not_send)]
pub async fn run_start(config_path: Option<&Path>, options: StartOptions) -> Result<()> {
    let ctx = CommandContext::new(config_path, &options.org, &options.repo)?;

    let mut request = StartRequest::new(options.pr, options.username)
        .with_bump(options.bump)
        .with_mode(ExecutionMode::from_dry_run(options.dry_run));
    if let Some(message) = options.message {
        request = request.with_intro(message);
    }

    match ctx.bot().start(request).await? {
        StartOutcome::Disabled => println!("merge bot is disabled"),
        StartOutcome::PermissionDenied => println!("merge refused: no push permission"),
        StartOutcome::Started { branch } => println!("pushed {branch}"),
    }
    Ok(())
}
