//! Core types for merge-bot

use serde::Deserialize;
use std::str::FromStr;

/// Platform configuration for one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// Create a config for github.com
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            host: None,
        }
    }

    /// Web host serving the repository
    pub fn web_host(&self) -> &str {
        self.host.as_deref().unwrap_or("github.com")
    }

    /// Web URL of the commit history at `rev` (branch name or sha)
    pub fn commits_url(&self, rev: &str) -> String {
        format!(
            "https://{}/{}/{}/commits/{rev}",
            self.web_host(),
            self.owner,
            self.repo
        )
    }
}

/// State of a single commit status entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Check passed
    Success,
    /// Check still running
    Pending,
    /// Check failed
    Failure,
    /// Check errored
    Error,
}

/// One entry of the commit status API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStatus {
    /// Status context (e.g. `continuous-integration/travis-ci/push`)
    pub context: String,
    /// Reported state
    pub state: StatusState,
}

impl CommitStatus {
    /// Create a status entry
    pub fn new(context: impl Into<String>, state: StatusState) -> Self {
        Self {
            context: context.into(),
            state,
        }
    }
}

/// One entry of the check suites API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSuite {
    /// Name of the application owning the suite
    pub app_name: String,
    /// Conclusion; `None` while the suite is incomplete
    pub conclusion: Option<String>,
}

impl CheckSuite {
    /// Create a check suite entry
    pub fn new(app_name: impl Into<String>, conclusion: Option<&str>) -> Self {
        Self {
            app_name: app_name.into(),
            conclusion: conclusion.map(ToString::to_string),
        }
    }
}

/// Semantic version component to bump on modified addons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BumpVersion {
    /// x.y.Z
    Patch,
    /// x.Y.0
    Minor,
    /// X.0.0
    Major,
}

impl BumpVersion {
    /// Every bump level
    pub const ALL: [Self; 3] = [Self::Patch, Self::Minor, Self::Major];

    /// Lowercase name, as used in branch names and hook placeholders
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl std::fmt::Display for BumpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "patch" => Ok(Self::Patch),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            other => Err(format!(
                "unknown bump level '{other}' (expected patch, minor or major)"
            )),
        }
    }
}

/// Whether side effects on the target branch and PR are real or simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Push, label and publish for real
    #[default]
    Live,
    /// Log the push, label and publish steps instead of performing them
    DryRun,
}

impl ExecutionMode {
    /// Build from a `--dry-run` flag
    pub const fn from_dry_run(dry_run: bool) -> Self {
        if dry_run { Self::DryRun } else { Self::Live }
    }

    /// Whether this is a dry run
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}
