//! Start: rebase a PR onto its target and push the merge bot branch

use super::branch::MergeIntent;
use super::comments::{self, Phase};
use super::MergeBot;
use crate::error::Result;
use crate::git::{self, ORIGIN};
use crate::types::{BumpVersion, ExecutionMode};
use tracing::info;

/// A merge command issued on a PR
#[derive(Debug, Clone)]
pub struct StartRequest {
    /// PR number
    pub pr: u64,
    /// User who issued the command
    pub username: String,
    /// Version bump for modified addons
    pub bump_version: Option<BumpVersion>,
    /// Execution mode, forwarded to restarts
    pub mode: ExecutionMode,
    /// Opener for the progress comment; random from the pool when `None`
    pub intro_message: Option<String>,
    /// Branch to merge into; the PR's base when `None`
    pub target_branch: Option<String>,
}

impl StartRequest {
    /// Live request without bump or custom intro
    pub fn new(pr: u64, username: impl Into<String>) -> Self {
        Self {
            pr,
            username: username.into(),
            bump_version: None,
            mode: ExecutionMode::Live,
            intro_message: None,
            target_branch: None,
        }
    }

    /// Set the version bump
    #[must_use]
    pub const fn with_bump(mut self, bump_version: Option<BumpVersion>) -> Self {
        self.bump_version = bump_version;
        self
    }

    /// Set the execution mode
    #[must_use]
    pub const fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the progress comment opener
    #[must_use]
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro_message = Some(intro.into());
        self
    }

    /// Merge into `target` instead of the PR's current base
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_branch = Some(target.into());
        self
    }
}

/// Result of [`MergeBot::start`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The merge bot feature switch is off
    Disabled,
    /// The user may not push; they were told so on the PR
    PermissionDenied,
    /// The merge bot branch was pushed and CI should run on it
    Started {
        /// Name of the pushed branch
        branch: String,
    },
}

impl MergeBot<'_> {
    /// Handle a merge command.
    ///
    /// Failures after the permission check are commented on the PR and
    /// returned as [`Error::Reported`](crate::error::Error::Reported).
    pub async fn start(&self, request: StartRequest) -> Result<StartOutcome> {
        if !self.enabled() {
            info!(pr = request.pr, "merge bot disabled, ignoring merge command");
            return Ok(StartOutcome::Disabled);
        }

        let StartRequest {
            pr,
            username,
            bump_version,
            mode,
            intro_message,
            target_branch,
        } = request;

        if !self.platform.can_push(&username).await? {
            info!(pr, username, "merge refused: no push permission");
            self.platform
                .create_pr_comment(pr, &comments::permission_denied(&username))
                .await?;
            return Ok(StartOutcome::PermissionDenied);
        }

        let target = match target_branch {
            Some(target) => target,
            None => self.platform.get_pr_base_ref(pr).await?,
        };
        let intent = MergeIntent::new(pr, target, username, bump_version);
        info!(pr, target = %intent.target_branch, ?mode, "starting merge");

        let result = self.push_merge_branch(&intent, intro_message).await;
        let branch = self
            .report_failure(pr, &intent.username, Phase::Start, result)
            .await?;
        Ok(StartOutcome::Started { branch })
    }

    async fn push_merge_branch(
        &self,
        intent: &MergeIntent,
        intro_message: Option<String>,
    ) -> Result<String> {
        let branch = intent.branch_name()?;
        let config = self.platform.config();
        let target = intent.target_branch.as_str();

        let repo = self
            .clones
            .clone_branch(&config.owner, &config.repo, target)?;

        let pull_refspec = format!("pull/{}/head:{branch}", intent.pr);
        repo.run(&["fetch", ORIGIN, &pull_refspec])?;
        repo.run(&["checkout", &branch])?;
        repo.run(&[
            "-c",
            "sequence.editor=:",
            "rebase",
            "--interactive",
            "--autosquash",
            target,
        ])?;

        // Replace any previous attempt so CI runs on the fresh rebase
        git::delete_remote_branch(repo.as_ref(), ORIGIN, &branch)?;
        repo.run(&["push", ORIGIN, &branch])?;
        info!(pr = intent.pr, branch, "pushed merge branch");

        let intro = intro_message.unwrap_or_else(|| self.intro_message());
        self.platform
            .create_pr_comment(intent.pr, &comments::merge_started(&intro, config, &branch))
            .await?;
        Ok(branch)
    }
}
