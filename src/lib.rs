//! merge-bot: merge pull requests once CI passes on a rebased branch
//!
//! A merge command rebases the PR onto its target and pushes it as a
//! specially named branch. CI runs on that branch; each CI event re-derives
//! the request from the branch name and, once the checks are green, the bot
//! merges the branch with a merge commit and closes the PR.

pub mod auth;
pub mod config;
pub mod error;
pub mod git;
pub mod maintenance;
pub mod merge;
pub mod platform;
pub mod types;
