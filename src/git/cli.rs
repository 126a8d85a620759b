//! `git` command line executor and GitHub clone provider

use super::{CloneProvider, CommandExit, GitRepo, command_line};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use tracing::{debug, info};

/// Output fragment git prints when `--branch` names a missing branch
const MISSING_BRANCH_MARKER: &str = "not found in upstream";

fn combined_output(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// A temporary clone driven through the `git` binary
///
/// The directory is deleted when the value is dropped.
pub struct GitCli {
    root: PathBuf,
    _dir: TempDir,
}

impl GitCli {
    fn git(&self, args: &[&str]) -> Result<Output> {
        debug!(command = %command_line(args), "running git");
        Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()
            .map_err(|e| Error::Internal(format!("failed to spawn git: {e}")))
    }
}

impl GitRepo for GitCli {
    fn path(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args)?;
        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: command_line(args),
                output: combined_output(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run_unchecked(&self, args: &[&str]) -> Result<CommandExit> {
        let output = self.git(args)?;
        Ok(CommandExit {
            code: output.status.code(),
            output: combined_output(&output),
        })
    }
}

/// Clones GitHub repositories over HTTPS with a token
pub struct GitHubCloner {
    token: String,
    host: String,
    user_name: String,
    user_email: String,
}

impl GitHubCloner {
    /// Create a cloner; `host` defaults to github.com
    pub fn new(
        token: impl Into<String>,
        host: Option<&str>,
        user_name: impl Into<String>,
        user_email: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            host: host.unwrap_or("github.com").to_string(),
            user_name: user_name.into(),
            user_email: user_email.into(),
        }
    }

    fn redact(&self, text: &str) -> String {
        text.replace(&self.token, "***")
    }
}

impl CloneProvider for GitHubCloner {
    fn clone_branch(&self, org: &str, repo: &str, branch: &str) -> Result<Box<dyn GitRepo>> {
        let dir = tempfile::Builder::new().prefix("merge-bot-").tempdir()?;
        let root = dir.path().join(repo);
        let root_str = root.to_string_lossy().into_owned();
        let url = format!(
            "https://x-access-token:{}@{}/{org}/{repo}.git",
            self.token, self.host
        );

        info!(org, repo, branch, "cloning");
        let output = Command::new("git")
            .args(["clone", "--quiet", "--branch", branch, &url, &root_str])
            .output()
            .map_err(|e| Error::Internal(format!("failed to spawn git: {e}")))?;

        if !output.status.success() {
            let text = self.redact(&combined_output(&output));
            if text.contains(MISSING_BRANCH_MARKER) {
                return Err(Error::BranchNotFound(branch.to_string()));
            }
            let public_url = format!("https://{}/{org}/{repo}.git", self.host);
            return Err(Error::CommandFailed {
                command: command_line(&["clone", "--quiet", "--branch", branch, &public_url]),
                output: text,
            });
        }

        let clone = GitCli { root, _dir: dir };
        clone.run(&["config", "user.name", &self.user_name])?;
        clone.run(&["config", "user.email", &self.user_email])?;
        Ok(Box::new(clone))
    }
}
