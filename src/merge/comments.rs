//! User-facing PR comments

use crate::error::Error;
use crate::types::PlatformConfig;
use rand::Rng;

/// Opener used when the configured pool is empty
const FALLBACK_INTRO: &str = "Hi, I'm going to merge this PR for you.";

/// Which entry point failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Rebasing and pushing the merge branch
    Start,
    /// Merging the green merge branch
    Finalize,
}

impl Phase {
    const fn failure_wording(self) -> &'static str {
        match self {
            Self::Start => "could not start",
            Self::Finalize => "could not be finalized",
        }
    }
}

/// Pick an opener uniformly from `messages`
pub fn pick_intro_message<R: Rng + ?Sized>(messages: &[String], rng: &mut R) -> String {
    if messages.is_empty() {
        return FALLBACK_INTRO.to_string();
    }
    messages[rng.gen_range(0..messages.len())].clone()
}

/// Opener used when a merge restarts because the target moved
pub fn retry_intro(target_branch: &str) -> String {
    format!(
        "It looks like something changed on `{target_branch}` in the meantime.\n\
         Let me try again (no action is required from you)."
    )
}

/// Reply to a merge command from a user without push rights
pub fn permission_denied(username: &str) -> String {
    format!("Sorry @{username} you do not have push permission, so I can't merge for you.")
}

/// Progress comment posted once the merge branch is pushed
pub fn merge_started(intro: &str, config: &PlatformConfig, branch: &str) -> String {
    format!(
        "{intro}\nRebased to [{branch}]({}), awaiting test results.",
        config.commits_url(branch)
    )
}

/// Report a failed entry point
pub fn merge_failed(username: &str, phase: Phase, err: &Error) -> String {
    let wording = phase.failure_wording();
    match err.root() {
        Error::CommandFailed { command, output } => format!(
            "@{username} The merge process {wording}, because command `{command}` \
             failed with output:\n```\n{}\n```",
            output.trim_end()
        ),
        other => format!("@{username} The merge process {wording}, because of an error: {other}."),
    }
}

/// Abort notice after CI failed on the merge branch
pub fn checks_failed(
    username: &str,
    config: &PlatformConfig,
    branch: &str,
    sha: &str,
    failed: &[String],
) -> String {
    let mut body = format!(
        "@{username} your merge command was aborted due to failed check(s), \
         which you can inspect on [this commit of {branch}]({}).",
        config.commits_url(sha)
    );
    if !failed.is_empty() {
        let names: Vec<String> = failed.iter().map(|n| format!("`{n}`")).collect();
        body.push_str(&format!("\n\nFailed: {}.", names.join(", ")));
    }
    body.push_str(
        "\n\nAfter fixing the problem, you can re-issue a merge command. \
         Please refrain from merging manually as it will most probably make \
         the target branch red.",
    );
    body
}

/// Success notice naming the merge commit
pub fn merged(config: &PlatformConfig, merge_sha: &str, target_branch: &str) -> String {
    format!(
        "Congratulations, your PR was merged at {merge_sha}. \
         Thanks a lot for contributing to {}. ❤️\n\n\
         PS: Don't worry if GitHub says there are unmerged commits: \
         it is due to a rebase before merge. \
         All commits of this PR have been merged into `{target_branch}`.",
        config.owner
    )
}

/// Merge commit message
pub fn merge_commit_message(pr: u64, target_branch: &str, username: &str) -> String {
    format!("Merge PR #{pr} into {target_branch}\n\nSigned-off-by {username}")
}
