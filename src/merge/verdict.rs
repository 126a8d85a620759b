//! Reduce CI signals for a commit to a single verdict (pure)

use crate::types::{CheckSuite, CommitStatus, StatusState};

/// Outcome of CI for one commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitVerdict {
    /// All observed checks passed and at least one check reported
    Success,
    /// At least one check failed
    Failure,
    /// Checks still running, or nothing reported yet
    Pending,
}

/// Which signals to consider, and the legacy CI compatibility pair
#[derive(Debug, Clone, Copy)]
pub struct VerdictRules<'a> {
    /// Status contexts to skip
    pub status_ignored: &'a [String],
    /// Check suite application names to skip
    pub check_suites_ignored: &'a [String],
    /// Status context prefix of the legacy CI provider
    pub legacy_ci_context_prefix: &'a str,
    /// Check suite app name of the provider's newer integration
    pub legacy_ci_app_name: &'a str,
}

impl<'a> VerdictRules<'a> {
    /// Borrow the rules from merge bot settings
    pub fn from_settings(settings: &'a crate::config::MergeBotSettings) -> Self {
        Self {
            status_ignored: &settings.status_ignored,
            check_suites_ignored: &settings.check_suites_ignored,
            legacy_ci_context_prefix: &settings.legacy_ci_context_prefix,
            legacy_ci_app_name: &settings.legacy_ci_app_name,
        }
    }

    fn ignores_status(&self, status: &CommitStatus) -> bool {
        self.status_ignored.contains(&status.context)
    }

    fn ignores_suite(&self, suite: &CheckSuite) -> bool {
        self.check_suites_ignored.contains(&suite.app_name)
    }

    fn is_legacy_context(&self, context: &str) -> bool {
        !self.legacy_ci_context_prefix.is_empty()
            && context.starts_with(self.legacy_ci_context_prefix)
    }
}

/// Compute the verdict for a commit.
///
/// Statuses are evaluated before check suites and the first pending or
/// failed entry decides. An incomplete suite from the legacy provider's newer
/// integration is skipped once the legacy status has succeeded, since that
/// provider reports through both APIs while migrating.
pub fn commit_verdict(
    statuses: &[CommitStatus],
    check_suites: &[CheckSuite],
    rules: &VerdictRules<'_>,
) -> CommitVerdict {
    let mut saw_success = false;
    let mut legacy_ci_succeeded = false;

    for status in statuses.iter().filter(|s| !rules.ignores_status(s)) {
        match status.state {
            StatusState::Success => {
                saw_success = true;
                if rules.is_legacy_context(&status.context) {
                    legacy_ci_succeeded = true;
                }
            }
            StatusState::Pending => return CommitVerdict::Pending,
            StatusState::Failure | StatusState::Error => return CommitVerdict::Failure,
        }
    }

    for suite in check_suites.iter().filter(|s| !rules.ignores_suite(s)) {
        match suite.conclusion.as_deref() {
            Some("success") => saw_success = true,
            None | Some("") => {
                if suite.app_name == rules.legacy_ci_app_name && legacy_ci_succeeded {
                    continue;
                }
                return CommitVerdict::Pending;
            }
            Some(_) => return CommitVerdict::Failure,
        }
    }

    if saw_success {
        CommitVerdict::Success
    } else {
        CommitVerdict::Pending
    }
}

/// Names of every non-ignored status or check suite that failed
pub fn failed_checks(
    statuses: &[CommitStatus],
    check_suites: &[CheckSuite],
    rules: &VerdictRules<'_>,
) -> Vec<String> {
    let failed_statuses = statuses
        .iter()
        .filter(|s| !rules.ignores_status(s))
        .filter(|s| matches!(s.state, StatusState::Failure | StatusState::Error))
        .map(|s| s.context.clone());

    let failed_suites = check_suites
        .iter()
        .filter(|s| !rules.ignores_suite(s))
        .filter(|s| {
            s.conclusion
                .as_deref()
                .is_some_and(|c| !c.is_empty() && c != "success")
        })
        .map(|s| s.app_name.clone());

    failed_statuses.chain(failed_suites).collect()
}
