//! Bot configuration loaded from `merge-bot/config.toml`.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name for merge-bot configuration within the user config dir.
const CONFIG_DIR: &str = "merge-bot";

/// Filename for the configuration file.
const CONFIG_FILE: &str = "config.toml";

/// Name of the feature switch guarding the merge bot tasks.
pub const MERGE_BOT_SWITCH: &str = "merge_bot";

const DEFAULT_INTRO_MESSAGES: &[&str] = &[
    "Hi there, I'm getting this PR ready to merge.",
    "On my way to merge this fine PR!",
    "Thanks for the contribution, let me merge this for you.",
    "What a nice day to merge a PR.",
    "This PR looks great, merging it right away.",
];

/// Complete configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub connection settings
    pub github: GitHubSettings,
    /// Merge bot behaviour
    pub merge_bot: MergeBotSettings,
    /// Feature switches
    pub tasks: TaskSwitches,
    /// External addon maintenance commands
    pub hooks: HookSettings,
}

/// GitHub connection settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    /// GitHub Enterprise host (None for github.com)
    pub host: Option<String>,
    /// API token; environment and `gh` are consulted when unset
    pub token: Option<String>,
}

/// Merge bot behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MergeBotSettings {
    /// Commit status contexts that never influence the verdict
    pub status_ignored: Vec<String>,
    /// Check suite application names that never influence the verdict
    pub check_suites_ignored: Vec<String>,
    /// Pool of progress comment openers
    pub intro_messages: Vec<String>,
    /// Package index where built wheels are published
    pub simple_index_root: Option<PathBuf>,
    /// Status context prefix of the legacy CI provider
    pub legacy_ci_context_prefix: String,
    /// Check suite application name of the same provider's newer integration
    pub legacy_ci_app_name: String,
    /// Label added to merged PRs
    pub merged_label: String,
    /// Committer name used in temporary clones
    pub git_user_name: String,
    /// Committer email used in temporary clones
    pub git_user_email: String,
}

impl Default for MergeBotSettings {
    fn default() -> Self {
        Self {
            status_ignored: Vec::new(),
            check_suites_ignored: Vec::new(),
            intro_messages: DEFAULT_INTRO_MESSAGES
                .iter()
                .map(ToString::to_string)
                .collect(),
            simple_index_root: None,
            legacy_ci_context_prefix: "continuous-integration/travis-ci".to_string(),
            legacy_ci_app_name: "Travis CI".to_string(),
            merged_label: "merged 🎉".to_string(),
            git_user_name: "merge-bot".to_string(),
            git_user_email: "merge-bot@users.noreply.github.com".to_string(),
        }
    }
}

/// Named feature switches
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskSwitches {
    /// Names of disabled tasks
    pub disabled: Vec<String>,
}

impl TaskSwitches {
    /// Whether the task named `name` may run
    pub fn is_enabled(&self, name: &str) -> bool {
        !self.disabled.iter().any(|d| d == name)
    }
}

/// Argv templates for addon maintenance, keyed by action
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HookSettings {
    /// Run on the merge branch before bumping (e.g. README regeneration)
    pub main_branch: Option<Vec<String>>,
    /// Bump the manifest version of `{addon}` by `{bump}` and commit
    pub bump: Option<Vec<String>>,
    /// Build and check the wheel of `{addon}`
    pub build: Option<Vec<String>>,
    /// Build the wheel of `{addon}` and publish it to `{index}`
    pub publish: Option<Vec<String>>,
    /// Extra environment for all hooks
    pub env: BTreeMap<String, String>,
}

/// Default configuration file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load configuration from `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

/// Load configuration from an explicit path, or the default location.
///
/// An explicit path must exist. A missing default file yields `Config::default()`.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => Ok(Config::default()),
    }
}
