//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by the start and status commands.

use merge_bot::auth::get_github_auth;
use merge_bot::config::{Config, resolve_config};
use merge_bot::error::Result;
use merge_bot::git::GitHubCloner;
use merge_bot::maintenance::HookMaintenance;
use merge_bot::merge::MergeBot;
use merge_bot::platform::GitHubService;
use std::path::Path;
use tracing::debug;

/// Shared context for CLI commands that act on one repository
///
/// Owns every collaborator so that a [`MergeBot`] can borrow them.
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// GitHub API service bound to the repository
    pub platform: GitHubService,
    /// Provider of temporary clones
    pub clones: GitHubCloner,
    /// Addon maintenance hooks
    pub maintenance: HookMaintenance,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// - Load configuration
    /// - Resolve the GitHub token
    /// - Create the platform service and clone provider
    pub fn new(config_path: Option<&Path>, org: &str, repo: &str) -> Result<Self> {
        let config = resolve_config(config_path)?;
        let host = config.github.host.clone();

        let auth = get_github_auth(config.github.token.as_deref(), host.as_deref())?;
        debug!(source = ?auth.source, "resolved GitHub credentials");

        let platform = GitHubService::new(&auth.token, org.to_string(), repo.to_string(), host)?;
        let clones = GitHubCloner::new(
            auth.token,
            config.github.host.as_deref(),
            config.merge_bot.git_user_name.clone(),
            config.merge_bot.git_user_email.clone(),
        );
        let maintenance = HookMaintenance::new(config.hooks.clone());

        Ok(Self {
            config,
            platform,
            clones,
            maintenance,
        })
    }

    /// Borrow a merge bot over this context
    pub fn bot(&self) -> MergeBot<'_> {
        MergeBot::new(&self.platform, &self.clones, &self.maintenance, &self.config)
    }
}
