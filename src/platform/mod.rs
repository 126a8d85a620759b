//! Platform services for GitHub
//!
//! Provides the hosting API operations the merge bot consumes.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{CheckSuite, CommitStatus, PlatformConfig};
use async_trait::async_trait;

/// Platform service trait for PR and commit operations
///
/// A service is bound to one repository (see [`PlatformConfig`]). Every
/// hosting failure, including rate limiting, surfaces as
/// [`Error::GitHubApi`](crate::error::Error::GitHubApi).
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Base (target) branch of a PR
    async fn get_pr_base_ref(&self, pr_number: u64) -> Result<String>;

    /// Check whether `username` has push permission on the repository
    async fn can_push(&self, username: &str) -> Result<bool>;

    /// Latest commit status entry per context for `sha`
    async fn commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>>;

    /// Check suites reported for `sha`
    async fn check_suites(&self, sha: &str) -> Result<Vec<CheckSuite>>;

    /// Create a comment on a PR
    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Add a label to a PR
    async fn add_label(&self, pr_number: u64, label: &str) -> Result<()>;

    /// Close a PR without merging it through the API
    async fn close_pr(&self, pr_number: u64) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
