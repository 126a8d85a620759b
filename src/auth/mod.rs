//! Authentication for GitHub
//!
//! Supports an explicit token, environment variables and the `gh` CLI.

mod github;

pub use github::{GitHubAuthConfig, get_github_auth};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the configuration file
    Config,
    /// Token from environment variable
    EnvVar,
    /// Token from CLI tool (gh)
    Cli,
}
