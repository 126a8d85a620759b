//! Merge orchestration
//!
//! Three entry points share one [`MergeBot`] context:
//! 1. Start - rebase the PR onto its target and push a merge bot branch
//! 2. Status - on each CI event, reduce CI signals to a verdict
//! 3. Finalize - merge a green merge bot branch, or restart if the target moved
//!
//! The merge bot branch name is the only state kept between invocations.

pub mod branch;
pub mod comments;
mod finalize;
mod start;
mod status;
pub mod verdict;

pub use branch::{MergeIntent, is_merge_bot_branch};
pub use comments::Phase;
pub use finalize::FinalizeOutcome;
pub use start::{StartOutcome, StartRequest};
pub use status::StatusOutcome;
pub use verdict::{CommitVerdict, VerdictRules, commit_verdict, failed_checks};

use crate::config::{Config, MERGE_BOT_SWITCH};
use crate::error::{Error, Result};
use crate::git::CloneProvider;
use crate::maintenance::AddonMaintenance;
use crate::platform::PlatformService;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Mutex, PoisonError};
use tracing::{error, warn};

/// Collaborators and settings for one repository
pub struct MergeBot<'a> {
    platform: &'a dyn PlatformService,
    clones: &'a dyn CloneProvider,
    maintenance: &'a dyn AddonMaintenance,
    config: &'a Config,
    rng: Mutex<StdRng>,
}

impl<'a> MergeBot<'a> {
    /// Create a merge bot for the repository `platform` is bound to
    pub fn new(
        platform: &'a dyn PlatformService,
        clones: &'a dyn CloneProvider,
        maintenance: &'a dyn AddonMaintenance,
        config: &'a Config,
    ) -> Self {
        Self {
            platform,
            clones,
            maintenance,
            config,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Use a deterministic random source for intro message selection
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    fn enabled(&self) -> bool {
        self.config.tasks.is_enabled(MERGE_BOT_SWITCH)
    }

    fn intro_message(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        comments::pick_intro_message(&self.config.merge_bot.intro_messages, &mut *rng)
    }

    /// Comment on the PR about a failed entry point, then propagate.
    ///
    /// Errors already reported by a nested entry point pass through unchanged.
    async fn report_failure<T>(
        &self,
        pr: u64,
        username: &str,
        phase: Phase,
        result: Result<T>,
    ) -> Result<T> {
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) if err.is_reported() => return Err(err),
            Err(err) => err,
        };

        error!(pr, ?phase, error = %err, "merge process failed");
        let body = comments::merge_failed(username, phase, &err);
        if let Err(comment_err) = self.platform.create_pr_comment(pr, &body).await {
            warn!(pr, error = %comment_err, "could not post failure comment");
        }
        Err(Error::Reported(Box::new(err)))
    }
}
