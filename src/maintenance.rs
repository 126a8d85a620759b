//! Addon maintenance actions run while finalizing a merge
//!
//! Version bumping and wheel building are repository specific, so the merge
//! bot only decides *when* they run. [`HookMaintenance`] delegates the *how*
//! to configured commands.

use crate::config::HookSettings;
use crate::error::{Error, Result};
use crate::git::GitRepo;
use crate::types::{BumpVersion, ExecutionMode};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Files that mark a directory as an addon
const MANIFEST_FILES: &[&str] = &["__manifest__.py", "__openerp__.py"];

/// Repository-specific actions applied to modified addons
pub trait AddonMaintenance: Send + Sync {
    /// Whether the top-level directory `dir` of the clone is an addon
    fn is_addon(&self, repo: &dyn GitRepo, dir: &str) -> bool;

    /// Actions normally run after each push to the target branch
    fn main_branch_actions(
        &self,
        repo: &dyn GitRepo,
        org: &str,
        repo_name: &str,
        target_branch: &str,
    ) -> Result<()>;

    /// Bump the manifest version of `addon` and commit the change
    fn bump_manifest_version(
        &self,
        repo: &dyn GitRepo,
        addon: &str,
        bump: BumpVersion,
    ) -> Result<()>;

    /// Build the wheel of `addon` and verify it installs
    fn build_and_check_wheel(&self, repo: &dyn GitRepo, addon: &str) -> Result<()>;

    /// Build the wheel of `addon` and publish it to `index_root`
    fn build_and_publish_wheel(
        &self,
        repo: &dyn GitRepo,
        addon: &str,
        index_root: &Path,
        mode: ExecutionMode,
    ) -> Result<()>;
}

/// Placeholder values substituted into hook templates
#[derive(Debug, Default)]
struct HookVars<'a> {
    addon: &'a str,
    bump: &'a str,
    index: &'a str,
    target: &'a str,
    org: &'a str,
    repo: &'a str,
}

fn expand(template: &str, vars: &HookVars<'_>) -> String {
    template
        .replace("{addon}", vars.addon)
        .replace("{bump}", vars.bump)
        .replace("{index}", vars.index)
        .replace("{target}", vars.target)
        .replace("{org}", vars.org)
        .replace("{repo}", vars.repo)
}

/// [`AddonMaintenance`] backed by argv templates from the configuration
#[derive(Debug, Clone, Default)]
pub struct HookMaintenance {
    hooks: HookSettings,
}

impl HookMaintenance {
    /// Create from hook settings
    pub const fn new(hooks: HookSettings) -> Self {
        Self { hooks }
    }

    fn run_hook(
        &self,
        name: &str,
        template: Option<&Vec<String>>,
        repo: &dyn GitRepo,
        vars: &HookVars<'_>,
    ) -> Result<()> {
        let Some(template) = template else {
            debug!(hook = name, "hook not configured, skipping");
            return Ok(());
        };
        let argv: Vec<String> = template.iter().map(|a| expand(a, vars)).collect();
        let Some((program, args)) = argv.split_first() else {
            debug!(hook = name, "hook is empty, skipping");
            return Ok(());
        };

        info!(hook = name, command = %argv.join(" "), "running hook");
        let output = Command::new(program)
            .args(args)
            .envs(&self.hooks.env)
            .current_dir(repo.path())
            .output()
            .map_err(|e| Error::Internal(format!("failed to spawn {program}: {e}")))?;

        if !output.status.success() {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(Error::CommandFailed {
                command: argv.join(" "),
                output: text,
            });
        }
        Ok(())
    }
}

impl AddonMaintenance for HookMaintenance {
    fn is_addon(&self, repo: &dyn GitRepo, dir: &str) -> bool {
        let dir = repo.path().join(dir);
        MANIFEST_FILES.iter().any(|f| dir.join(f).is_file())
    }

    fn main_branch_actions(
        &self,
        repo: &dyn GitRepo,
        org: &str,
        repo_name: &str,
        target_branch: &str,
    ) -> Result<()> {
        let vars = HookVars {
            target: target_branch,
            org,
            repo: repo_name,
            ..HookVars::default()
        };
        self.run_hook("main_branch", self.hooks.main_branch.as_ref(), repo, &vars)
    }

    fn bump_manifest_version(
        &self,
        repo: &dyn GitRepo,
        addon: &str,
        bump: BumpVersion,
    ) -> Result<()> {
        let vars = HookVars {
            addon,
            bump: bump.as_str(),
            ..HookVars::default()
        };
        self.run_hook("bump", self.hooks.bump.as_ref(), repo, &vars)
    }

    fn build_and_check_wheel(&self, repo: &dyn GitRepo, addon: &str) -> Result<()> {
        let vars = HookVars {
            addon,
            ..HookVars::default()
        };
        self.run_hook("build", self.hooks.build.as_ref(), repo, &vars)
    }

    fn build_and_publish_wheel(
        &self,
        repo: &dyn GitRepo,
        addon: &str,
        index_root: &Path,
        mode: ExecutionMode,
    ) -> Result<()> {
        if mode.is_dry_run() {
            info!(addon, index = %index_root.display(), "DRY-RUN publish wheel");
            return Ok(());
        }
        let index = index_root.to_string_lossy();
        let vars = HookVars {
            addon,
            index: &index,
            ..HookVars::default()
        };
        self.run_hook("publish", self.hooks.publish.as_ref(), repo, &vars)
    }
}
