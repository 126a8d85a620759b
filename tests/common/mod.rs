//! Shared test utilities

#![allow(dead_code)]

mod mock_git;
mod mock_platform;

pub use mock_git::{CloneCall, MockGit, MockRepo};
pub use mock_platform::{AddLabelCall, CreateCommentCall, MockPlatformService};

use merge_bot::config::Config;
use merge_bot::error::Result;
use merge_bot::git::GitRepo;
use merge_bot::maintenance::AddonMaintenance;
use merge_bot::merge::MergeBot;
use merge_bot::types::{BumpVersion, ExecutionMode, PlatformConfig};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

/// Platform config for `OCA/repo` on github.com
pub fn github_config() -> PlatformConfig {
    PlatformConfig::new("OCA", "repo")
}

/// Maintenance double that records calls
#[derive(Default)]
pub struct MockMaintenance {
    addons: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockMaintenance {
    /// Treat `dirs` as addons
    pub fn with_addons(dirs: &[&str]) -> Self {
        Self {
            addons: dirs.iter().map(ToString::to_string).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Recorded calls, e.g. `bump mod_a minor`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AddonMaintenance for MockMaintenance {
    fn is_addon(&self, _repo: &dyn GitRepo, dir: &str) -> bool {
        self.addons.contains(dir)
    }

    fn main_branch_actions(
        &self,
        _repo: &dyn GitRepo,
        org: &str,
        repo_name: &str,
        target_branch: &str,
    ) -> Result<()> {
        self.record(format!("main_branch {org}/{repo_name}@{target_branch}"));
        Ok(())
    }

    fn bump_manifest_version(
        &self,
        _repo: &dyn GitRepo,
        addon: &str,
        bump: BumpVersion,
    ) -> Result<()> {
        self.record(format!("bump {addon} {bump}"));
        Ok(())
    }

    fn build_and_check_wheel(&self, _repo: &dyn GitRepo, addon: &str) -> Result<()> {
        self.record(format!("build {addon}"));
        Ok(())
    }

    fn build_and_publish_wheel(
        &self,
        _repo: &dyn GitRepo,
        addon: &str,
        index_root: &Path,
        mode: ExecutionMode,
    ) -> Result<()> {
        self.record(format!("publish {addon} {} {mode:?}", index_root.display()));
        Ok(())
    }
}

/// Collaborators for one test, owned so a `MergeBot` can borrow them
pub struct Harness {
    pub platform: MockPlatformService,
    pub git: MockGit,
    pub maintenance: MockMaintenance,
    pub config: Config,
}

impl Harness {
    /// Fresh harness: alice may push, PR 42 targets `main`
    pub fn new() -> Self {
        let platform = MockPlatformService::with_config(github_config());
        platform.grant_push("alice");
        platform.setup_open_pr(42, "main");
        Self {
            platform,
            git: MockGit::new(),
            maintenance: MockMaintenance::default(),
            config: Config::default(),
        }
    }

    /// Borrow a merge bot with a fixed seed
    pub fn bot(&self) -> MergeBot<'_> {
        MergeBot::new(&self.platform, &self.git, &self.maintenance, &self.config).with_seed(1)
    }
}
