//! Finalize: merge a green merge bot branch into its target

use super::branch::MergeIntent;
use super::comments;
use super::start::{StartOutcome, StartRequest};
use super::MergeBot;
use crate::error::Result;
use crate::git::{self, GitRepo, ORIGIN};
use crate::types::ExecutionMode;
use tracing::info;

/// Result of [`MergeBot::finalize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The PR was merged and closed
    Merged {
        /// SHA of the merge commit on the target branch
        sha: String,
    },
    /// The target branch moved; a fresh merge bot branch was pushed
    Restarted {
        /// Name of the new merge bot branch
        branch: String,
    },
    /// The target moved and the restart did not push a branch
    NotMerged,
}

impl MergeBot<'_> {
    /// Merge the merge bot branch for `intent` using `repo`.
    ///
    /// `repo` must be a clone with the merge bot branch checked out, whose
    /// head already has a successful [`CommitVerdict`](super::CommitVerdict).
    pub async fn finalize(
        &self,
        repo: &dyn GitRepo,
        intent: &MergeIntent,
        mode: ExecutionMode,
    ) -> Result<FinalizeOutcome> {
        let branch = intent.branch_name()?;
        let target = intent.target_branch.as_str();
        let config = self.platform.config();

        repo.run(&["checkout", target])?;
        if !git::is_ancestor(repo, target, &branch)? {
            info!(branch, target, "merge branch is behind its target, rebasing again");
            let request = StartRequest::new(intent.pr, intent.username.clone())
                .with_bump(intent.bump_version)
                .with_mode(mode)
                .with_intro(comments::retry_intro(target))
                .with_target(target);
            return Ok(match self.start(request).await? {
                StartOutcome::Started { branch } => FinalizeOutcome::Restarted { branch },
                StartOutcome::Disabled | StartOutcome::PermissionDenied => {
                    FinalizeOutcome::NotMerged
                }
            });
        }

        // Addons are taken from the PR itself, not from the merge bot branch,
        // so that files touched by CI-side regeneration are not bumped.
        let pr_ref = format!("tmp-pr-{}", intent.pr);
        repo.run(&[
            "fetch",
            ORIGIN,
            &format!("refs/pull/{}/head:{pr_ref}", intent.pr),
        ])?;
        repo.run(&["checkout", &pr_ref])?;
        let addons: Vec<String> = git::modified_top_level_dirs(repo, target)?
            .into_iter()
            .filter(|dir| self.maintenance.is_addon(repo, dir))
            .collect();
        info!(pr = intent.pr, ?addons, "modified addons");

        repo.run(&["checkout", &branch])?;
        if !addons.is_empty() {
            self.maintenance
                .main_branch_actions(repo, &config.owner, &config.repo, target)?;
        }
        if let Some(bump) = intent.bump_version {
            for addon in &addons {
                self.maintenance.bump_manifest_version(repo, addon, bump)?;
                self.maintenance.build_and_check_wheel(repo, addon)?;
            }
        }

        repo.run(&["checkout", target])?;
        let message = comments::merge_commit_message(intent.pr, target, &intent.username);
        repo.run(&["merge", "--no-ff", "-m", &message, &branch])?;
        if mode.is_dry_run() {
            info!("DRY-RUN git push in {}/{}@{target}", config.owner, config.repo);
        } else {
            info!("git push in {}/{}@{target}", config.owner, config.repo);
            repo.run(&["push", ORIGIN, target])?;
        }

        if intent.bump_version.is_some()
            && let Some(index_root) = self.config.merge_bot.simple_index_root.as_deref()
        {
            for addon in &addons {
                self.maintenance
                    .build_and_publish_wheel(repo, addon, index_root, mode)?;
            }
        }

        git::delete_remote_branch(repo, ORIGIN, &branch)?;

        let merge_sha = git::head_sha(repo)?;
        self.platform
            .create_pr_comment(intent.pr, &comments::merged(config, &merge_sha, target))
            .await?;

        let label = self.config.merge_bot.merged_label.as_str();
        if mode.is_dry_run() {
            info!(pr = intent.pr, label, "DRY-RUN add label");
        } else {
            self.platform.add_label(intent.pr, label).await?;
        }
        self.platform.close_pr(intent.pr).await?;

        info!(pr = intent.pr, sha = %merge_sha, "merged");
        Ok(FinalizeOutcome::Merged { sha: merge_sha })
    }
}
