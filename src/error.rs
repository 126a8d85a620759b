//! Error types for merge-bot

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the merge bot
#[derive(Debug, Error)]
pub enum Error {
    /// A git (or hook) command exited with a non-zero status
    #[error("command `{command}` failed with output:\n{output}")]
    CommandFailed {
        /// The command line that was run
        command: String,
        /// Combined stdout and stderr of the command
        output: String,
    },

    /// GitHub API failure (including rate limiting and transport errors)
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// A branch name that does not follow the merge bot naming protocol
    #[error("not a merge bot branch: {0}")]
    InvalidMergeBranch(String),

    /// A merge intent that cannot be encoded into a branch name
    #[error("invalid merge intent: {0}")]
    InvalidIntent(String),

    /// The requested branch does not exist on the remote
    #[error("remote branch not found: {0}")]
    BranchNotFound(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// No usable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// I/O failure outside of a command invocation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),

    /// An error that has already been reported on the pull request
    #[error(transparent)]
    Reported(Box<Error>),
}

impl Error {
    /// Innermost error, looking through `Reported` wrappers
    pub fn root(&self) -> &Self {
        match self {
            Self::Reported(inner) => inner.root(),
            other => other,
        }
    }

    /// Whether the root cause is a failed command
    pub fn is_command_failure(&self) -> bool {
        matches!(self.root(), Self::CommandFailed { .. })
    }

    /// Whether this error was already communicated on the pull request
    pub const fn is_reported(&self) -> bool {
        matches!(self, Self::Reported(_))
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}
