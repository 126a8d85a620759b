//! Git command execution in temporary clones
//!
//! All git work happens in a fresh clone owned by one invocation. The clone
//! is removed when the [`GitRepo`] value is dropped.

mod cli;

pub use cli::{GitCli, GitHubCloner};

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// Name of the remote every clone pushes to
pub const ORIGIN: &str = "origin";

/// Output fragments git prints when deleting a ref the remote does not have
const MISSING_REF_MARKERS: &[&str] = &["unable to delete", "remote ref does not exist"];

/// A working copy that runs git commands synchronously
pub trait GitRepo: Send + Sync {
    /// Root of the working copy
    fn path(&self) -> &Path;

    /// Run `git <args>` and return its stdout.
    ///
    /// A non-zero exit is [`Error::CommandFailed`] carrying the command and
    /// the combined stdout/stderr.
    fn run(&self, args: &[&str]) -> Result<String>;

    /// Run `git <args>` and return its exit code, whatever it is
    fn run_unchecked(&self, args: &[&str]) -> Result<CommandExit>;
}

/// Exit code and combined output of a command run with [`GitRepo::run_unchecked`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandExit {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    /// Combined stdout and stderr
    pub output: String,
}

/// Acquires scoped clones of a repository
pub trait CloneProvider: Send + Sync {
    /// Clone `org/repo` with `branch` checked out.
    ///
    /// Returns [`Error::BranchNotFound`] if the remote has no such branch.
    fn clone_branch(&self, org: &str, repo: &str, branch: &str) -> Result<Box<dyn GitRepo>>;
}

/// Format a command line for error messages
pub fn command_line(args: &[&str]) -> String {
    let mut line = String::from("git");
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Delete `branch` on `remote`, treating an already absent branch as success
pub fn delete_remote_branch(repo: &dyn GitRepo, remote: &str, branch: &str) -> Result<()> {
    let refspec = format!(":{branch}");
    match repo.run(&["push", remote, &refspec]) {
        Ok(_) => {
            info!(remote, branch, "deleted remote branch");
            Ok(())
        }
        Err(Error::CommandFailed { output, .. })
            if MISSING_REF_MARKERS.iter().any(|m| output.contains(m)) =>
        {
            debug!(remote, branch, "remote branch did not exist");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// SHA of the checked out commit
pub fn head_sha(repo: &dyn GitRepo) -> Result<String> {
    Ok(repo.run(&["rev-parse", "HEAD"])?.trim().to_string())
}

/// Whether `ancestor` is reachable from `descendant`.
///
/// Exit 1 means "not an ancestor"; any other failure (e.g. 128 for an
/// unknown revision) is [`Error::CommandFailed`].
pub fn is_ancestor(repo: &dyn GitRepo, ancestor: &str, descendant: &str) -> Result<bool> {
    let args = ["merge-base", "--is-ancestor", ancestor, descendant];
    let exit = repo.run_unchecked(&args)?;
    match exit.code {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        _ => Err(Error::CommandFailed {
            command: command_line(&args),
            output: exit.output,
        }),
    }
}

/// Top-level directories changed on HEAD since it forked from `base`
pub fn modified_top_level_dirs(repo: &dyn GitRepo, base: &str) -> Result<Vec<String>> {
    let range = format!("{base}...HEAD");
    let output = repo.run(&["diff", "--name-only", &range])?;
    Ok(top_level_dirs(&output))
}

/// Parse `git diff --name-only` output into sorted, unique top-level dirs.
///
/// Files at the repository root do not belong to any directory and are skipped.
pub fn top_level_dirs(name_only_output: &str) -> Vec<String> {
    name_only_output
        .lines()
        .map(str::trim)
        .filter_map(|line| line.split_once('/').map(|(dir, _)| dir))
        .filter(|dir| !dir.is_empty())
        .map(ToString::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
