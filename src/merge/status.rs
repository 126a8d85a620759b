//! Status: react to a CI event on a merge bot branch

use super::branch::MergeIntent;
use super::comments::{self, Phase};
use super::finalize::FinalizeOutcome;
use super::verdict::{CommitVerdict, VerdictRules, commit_verdict, failed_checks};
use super::MergeBot;
use crate::error::{Error, Result};
use crate::git::{self, ORIGIN};
use crate::types::ExecutionMode;
use tracing::{debug, info};

/// Result of [`MergeBot::status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    /// The merge bot feature switch is off
    Disabled,
    /// The event is for a commit that is no longer the branch head
    Stale,
    /// CI is still running
    Pending,
    /// CI passed and finalization ran
    Finalized(FinalizeOutcome),
    /// CI failed; the user was told and the branch deleted
    Aborted,
}

impl MergeBot<'_> {
    /// Handle a CI event for `sha` on merge bot branch `branch`
    pub async fn status(
        &self,
        branch: &str,
        sha: &str,
        mode: ExecutionMode,
    ) -> Result<StatusOutcome> {
        if !self.enabled() {
            info!(branch, "merge bot disabled, ignoring status");
            return Ok(StatusOutcome::Disabled);
        }

        let intent = MergeIntent::from_branch_name(branch)?;
        let config = self.platform.config();

        let repo = match self.clones.clone_branch(&config.owner, &config.repo, branch) {
            Ok(repo) => repo,
            Err(Error::BranchNotFound(_)) => {
                info!(branch, "merge branch is gone, ignoring status");
                return Ok(StatusOutcome::Stale);
            }
            Err(e) => return Err(e),
        };

        let head = git::head_sha(repo.as_ref())?;
        if head != sha {
            info!(branch, sha, head, "status is for a superseded commit, ignoring");
            return Ok(StatusOutcome::Stale);
        }

        let statuses = self.platform.commit_statuses(sha).await?;
        let suites = self.platform.check_suites(sha).await?;
        let rules = VerdictRules::from_settings(&self.config.merge_bot);

        match commit_verdict(&statuses, &suites, &rules) {
            CommitVerdict::Pending => {
                debug!(branch, sha, "checks in progress");
                Ok(StatusOutcome::Pending)
            }
            CommitVerdict::Success => {
                let result = self.finalize(repo.as_ref(), &intent, mode).await;
                let outcome = self
                    .report_failure(intent.pr, &intent.username, Phase::Finalize, result)
                    .await?;
                Ok(StatusOutcome::Finalized(outcome))
            }
            CommitVerdict::Failure => {
                let failed = failed_checks(&statuses, &suites, &rules);
                info!(branch, sha, ?failed, "checks failed, aborting merge");
                self.platform
                    .create_pr_comment(
                        intent.pr,
                        &comments::checks_failed(&intent.username, config, branch, sha, &failed),
                    )
                    .await?;
                git::delete_remote_branch(repo.as_ref(), ORIGIN, branch)?;
                Ok(StatusOutcome::Aborted)
            }
        }
    }
}
