//! GitHub token discovery

use super::AuthSource;
use crate::error::{Error, Result};
use std::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
    /// GitHub Enterprise host, if any
    pub host: Option<String>,
}

/// Resolve a GitHub token
///
/// Order: explicit token, `GITHUB_TOKEN`/`GH_TOKEN`, then `gh auth token`.
pub fn get_github_auth(explicit: Option<&str>, host: Option<&str>) -> Result<GitHubAuthConfig> {
    let host = host.map(ToString::to_string);

    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        debug!("using GitHub token from configuration");
        return Ok(GitHubAuthConfig {
            token: token.to_string(),
            source: AuthSource::Config,
            host,
        });
    }

    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var)
            && !token.is_empty()
        {
            debug!(var, "using GitHub token from environment");
            return Ok(GitHubAuthConfig {
                token,
                source: AuthSource::EnvVar,
                host,
            });
        }
    }

    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(ref h) = host {
        cmd.args(["--hostname", h]);
    }

    let output = cmd.output().map_err(|e| {
        Error::Auth(format!(
            "no GitHub token found: set GITHUB_TOKEN or install gh ({e})"
        ))
    })?;

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || token.is_empty() {
        return Err(Error::Auth(
            "no GitHub token found: set GITHUB_TOKEN or run 'gh auth login'".to_string(),
        ));
    }

    debug!("using GitHub token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
        host,
    })
}
