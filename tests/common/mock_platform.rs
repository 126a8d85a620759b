//! Mock platform service for testing

#![allow(dead_code)]

use async_trait::async_trait;
use merge_bot::error::{Error, Result};
use merge_bot::platform::PlatformService;
use merge_bot::types::{CheckSuite, CommitStatus, PlatformConfig};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `add_label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLabelCall {
    pub pr_number: u64,
    pub label: String,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable responses per PR / commit
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    pushers: Mutex<HashSet<String>>,
    pr_bases: Mutex<HashMap<u64, String>>,
    status_responses: Mutex<HashMap<String, Vec<CommitStatus>>>,
    check_suite_responses: Mutex<HashMap<String, Vec<CheckSuite>>>,
    // Call tracking
    pr_base_calls: Mutex<Vec<u64>>,
    can_push_calls: Mutex<Vec<String>>,
    status_calls: Mutex<Vec<String>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    add_label_calls: Mutex<Vec<AddLabelCall>>,
    close_pr_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_comment: Mutex<Option<String>>,
    error_on_statuses: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            pushers: Mutex::new(HashSet::new()),
            pr_bases: Mutex::new(HashMap::new()),
            pr_base_calls: Mutex::new(Vec::new()),
            status_responses: Mutex::new(HashMap::new()),
            check_suite_responses: Mutex::new(HashMap::new()),
            can_push_calls: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            add_label_calls: Mutex::new(Vec::new()),
            close_pr_calls: Mutex::new(Vec::new()),
            error_on_comment: Mutex::new(None),
            error_on_statuses: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `create_pr_comment` return an error
    pub fn fail_comment(&self, msg: &str) {
        *self.error_on_comment.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `commit_statuses` return an error
    pub fn fail_statuses(&self, msg: &str) {
        *self.error_on_statuses.lock().unwrap() = Some(msg.to_string());
    }

    // === Response setup ===

    /// Grant push permission to `username`
    pub fn grant_push(&self, username: &str) {
        self.pushers.lock().unwrap().insert(username.to_string());
    }

    /// Set the base branch reported for `pr_number`
    pub fn setup_open_pr(&self, pr_number: u64, base: &str) {
        self.pr_bases
            .lock()
            .unwrap()
            .insert(pr_number, base.to_string());
    }

    /// Set the CI signals reported for `sha`
    pub fn set_ci(&self, sha: &str, statuses: Vec<CommitStatus>, suites: Vec<CheckSuite>) {
        self.status_responses
            .lock()
            .unwrap()
            .insert(sha.to_string(), statuses);
        self.check_suite_responses
            .lock()
            .unwrap()
            .insert(sha.to_string(), suites);
    }

    // === Call verification methods ===

    /// Get all `create_pr_comment` calls
    pub fn get_create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    /// Get all `add_label` calls
    pub fn get_add_label_calls(&self) -> Vec<AddLabelCall> {
        self.add_label_calls.lock().unwrap().clone()
    }

    /// Get all `close_pr` calls
    pub fn get_close_pr_calls(&self) -> Vec<u64> {
        self.close_pr_calls.lock().unwrap().clone()
    }

    /// Get all PR numbers `get_pr_base_ref` was called with
    pub fn get_pr_base_calls(&self) -> Vec<u64> {
        self.pr_base_calls.lock().unwrap().clone()
    }

    /// Get all shas `commit_statuses` was called with
    pub fn get_status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }

    /// Get all usernames `can_push` was called with
    pub fn get_can_push_calls(&self) -> Vec<String> {
        self.can_push_calls.lock().unwrap().clone()
    }

    /// Total number of side-effecting calls (comments, labels, closes)
    pub fn side_effect_count(&self) -> usize {
        self.create_comment_calls.lock().unwrap().len()
            + self.add_label_calls.lock().unwrap().len()
            + self.close_pr_calls.lock().unwrap().len()
    }

    /// Assert exactly one comment was posted and return its body
    pub fn single_comment(&self) -> String {
        let calls = self.get_create_comment_calls();
        assert_eq!(calls.len(), 1, "Expected one comment but got: {calls:?}");
        calls[0].body.clone()
    }

    /// Assert some comment contains `needle`
    pub fn assert_comment_contains(&self, needle: &str) {
        let calls = self.get_create_comment_calls();
        assert!(
            calls.iter().any(|c| c.body.contains(needle)),
            "Expected a comment containing {needle:?} but got: {calls:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pr_base_ref(&self, pr_number: u64) -> Result<String> {
        self.pr_base_calls.lock().unwrap().push(pr_number);
        let bases = self.pr_bases.lock().unwrap();
        bases
            .get(&pr_number)
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} not found")))
    }

    async fn can_push(&self, username: &str) -> Result<bool> {
        self.can_push_calls
            .lock()
            .unwrap()
            .push(username.to_string());
        Ok(self.pushers.lock().unwrap().contains(username))
    }

    async fn commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        self.status_calls.lock().unwrap().push(sha.to_string());

        if let Some(msg) = self.error_on_statuses.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let responses = self.status_responses.lock().unwrap();
        Ok(responses.get(sha).cloned().unwrap_or_default())
    }

    async fn check_suites(&self, sha: &str) -> Result<Vec<CheckSuite>> {
        let responses = self.check_suite_responses.lock().unwrap();
        Ok(responses.get(sha).cloned().unwrap_or_default())
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number,
                body: body.to_string(),
            });

        if let Some(msg) = self.error_on_comment.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    async fn add_label(&self, pr_number: u64, label: &str) -> Result<()> {
        self.add_label_calls.lock().unwrap().push(AddLabelCall {
            pr_number,
            label: label.to_string(),
        });
        Ok(())
    }

    async fn close_pr(&self, pr_number: u64) -> Result<()> {
        self.close_pr_calls.lock().unwrap().push(pr_number);
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
