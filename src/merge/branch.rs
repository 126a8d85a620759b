//! Merge bot branch naming
//!
//! A merge request is persisted only as the name of a branch on the remote:
//!
//! ```text
//! {target}-ocabot-merge-pr-{pr}-by-{username}-bump-{nobump|patch|minor|major}
//! ```
//!
//! Usernames are escaped so that every name is a valid git ref and decoding
//! never needs a lookup. Only canonical names decode, which makes
//! [`MergeIntent::branch_name`] and [`MergeIntent::from_branch_name`] inverse
//! bijections.

use crate::error::{Error, Result};
use crate::types::BumpVersion;
use regex::Regex;
use std::fmt::Write as _;
use std::sync::LazyLock;

/// Separator between the target branch and the rest of the name
const MARKER: &str = "-ocabot-merge-pr-";

/// Bump token used when no version bump is requested
const NO_BUMP: &str = "nobump";

/// Escape character for username bytes outside `[A-Za-z0-9-]`
const ESCAPE: char = '_';

static BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<target>.+?)-ocabot-merge-pr-(?P<pr>[1-9][0-9]*)-by-(?P<user>.+)-bump-(?P<bump>nobump|patch|minor|major)$",
    )
    .expect("valid regex")
});

/// Request to merge PR `pr` into `target_branch` on behalf of `username`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeIntent {
    /// Pull request number
    pub pr: u64,
    /// Branch the PR is merged into
    pub target_branch: String,
    /// User who issued the merge command
    pub username: String,
    /// Version bump applied to modified addons
    pub bump_version: Option<BumpVersion>,
}

impl MergeIntent {
    /// Create an intent
    pub fn new(
        pr: u64,
        target_branch: impl Into<String>,
        username: impl Into<String>,
        bump_version: Option<BumpVersion>,
    ) -> Self {
        Self {
            pr,
            target_branch: target_branch.into(),
            username: username.into(),
            bump_version,
        }
    }

    /// Encode into the merge bot branch name
    pub fn branch_name(&self) -> Result<String> {
        if self.pr == 0 {
            return Err(Error::InvalidIntent("PR number must be positive".to_string()));
        }
        if self.target_branch.is_empty() {
            return Err(Error::InvalidIntent("target branch is empty".to_string()));
        }
        if is_merge_bot_branch(&self.target_branch) {
            return Err(Error::InvalidIntent(format!(
                "target branch {} is itself a merge bot branch",
                self.target_branch
            )));
        }
        if self.username.is_empty() {
            return Err(Error::InvalidIntent("username is empty".to_string()));
        }

        let bump = self.bump_version.map_or(NO_BUMP, BumpVersion::as_str);
        Ok(format!(
            "{}{MARKER}{}-by-{}-bump-{bump}",
            self.target_branch,
            self.pr,
            escape_username(&self.username)
        ))
    }

    /// Decode a merge bot branch name
    pub fn from_branch_name(name: &str) -> Result<Self> {
        let invalid = || Error::InvalidMergeBranch(name.to_string());
        let caps = BRANCH_RE.captures(name).ok_or_else(invalid)?;

        let pr = caps["pr"].parse().map_err(|_| invalid())?;
        let username = unescape_username(&caps["user"]).ok_or_else(invalid)?;
        let bump_version = match &caps["bump"] {
            NO_BUMP => None,
            other => Some(other.parse().map_err(|_| invalid())?),
        };
        let intent = Self::new(pr, &caps["target"], username, bump_version);

        // Reject non-canonical spellings so distinct names never share an intent
        match intent.branch_name() {
            Ok(canonical) if canonical == name => Ok(intent),
            _ => Err(invalid()),
        }
    }
}

/// Whether `name` follows the merge bot naming protocol
pub fn is_merge_bot_branch(name: &str) -> bool {
    name.contains(MARKER)
}

fn escape_username(username: &str) -> String {
    let mut out = String::with_capacity(username.len());
    for byte in username.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "{ESCAPE}{byte:02x}");
        }
    }
    out
}

fn unescape_username(escaped: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(escaped.len());
    let mut iter = escaped.bytes();
    while let Some(byte) = iter.next() {
        if char::from(byte) == ESCAPE {
            let hi = char::from(iter.next()?).to_digit(16)?;
            let lo = char::from(iter.next()?).to_digit(16)?;
            bytes.push(u8::try_from(hi * 16 + lo).ok()?);
        } else {
            bytes.push(byte);
        }
    }
    String::from_utf8(bytes).ok()
}
