//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{CheckSuite, CommitStatus, PlatformConfig, StatusState};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Permissions that allow pushing to a repository
const PUSH_PERMISSIONS: &[&str] = &["admin", "maintain", "write"];

#[derive(Deserialize)]
struct CollaboratorPermission {
    permission: String,
}

#[derive(Deserialize)]
struct PullBase {
    base: BranchRef,
}

#[derive(Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Deserialize)]
struct CombinedStatus {
    statuses: Vec<RawStatus>,
}

#[derive(Deserialize)]
struct RawStatus {
    context: String,
    state: StatusState,
}

#[derive(Deserialize)]
struct CheckSuitesResponse {
    check_suites: Vec<RawCheckSuite>,
}

#[derive(Deserialize)]
struct RawCheckSuite {
    app: Option<RawApp>,
    conclusion: Option<String>,
}

#[derive(Deserialize)]
struct RawApp {
    name: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for endpoints octocrab does not cover
    http_client: Client,
    /// REST API root, e.g. `https://api.github.com`
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let api_base = host.as_ref().map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_api_base(token, PlatformConfig { owner, repo, host }, api_base)
    }

    fn with_api_base(token: &str, config: PlatformConfig, api_base: String) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("merge-bot")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!(
            "{}/repos/{}/{}/{path}",
            self.api_base, self.config.owner, self.config.repo
        );
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// GET a repository-relative endpoint and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("GET {path} failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(path, "endpoint returned 404");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "GET {path} returned {}",
                response.status()
            )));
        }

        let body = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse {path}: {e}")))?;
        Ok(Some(body))
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pr_base_ref(&self, pr_number: u64) -> Result<String> {
        debug!(pr_number, "getting PR base");
        let pull: PullBase = self
            .get_json(&format!("pulls/{pr_number}"))
            .await?
            .ok_or_else(|| Error::GitHubApi(format!("PR #{pr_number} not found")))?;

        debug!(pr_number, base = %pull.base.name, "got PR base");
        Ok(pull.base.name)
    }

    async fn can_push(&self, username: &str) -> Result<bool> {
        debug!(username, "checking push permission");
        let permission: Option<CollaboratorPermission> = self
            .get_json(&format!("collaborators/{username}/permission"))
            .await?;

        // A non-collaborator yields 404
        let can_push =
            permission.is_some_and(|p| PUSH_PERMISSIONS.contains(&p.permission.as_str()));
        debug!(username, can_push, "checked push permission");
        Ok(can_push)
    }

    async fn commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        debug!(sha, "fetching commit statuses");
        let combined: Option<CombinedStatus> = self
            .get_json(&format!("commits/{sha}/status?per_page=100"))
            .await?;

        let statuses: Vec<CommitStatus> = combined
            .map(|c| c.statuses)
            .unwrap_or_default()
            .into_iter()
            .map(|s| CommitStatus::new(s.context, s.state))
            .collect();
        debug!(sha, count = statuses.len(), "fetched commit statuses");
        Ok(statuses)
    }

    async fn check_suites(&self, sha: &str) -> Result<Vec<CheckSuite>> {
        debug!(sha, "fetching check suites");
        let response: Option<CheckSuitesResponse> = self
            .get_json(&format!("commits/{sha}/check-suites?per_page=100"))
            .await?;

        let suites: Vec<CheckSuite> = response
            .map(|r| r.check_suites)
            .unwrap_or_default()
            .into_iter()
            .map(|s| CheckSuite {
                app_name: s.app.map(|a| a.name).unwrap_or_default(),
                conclusion: s.conclusion.filter(|c| !c.is_empty()),
            })
            .collect();
        debug!(sha, count = suites.len(), "fetched check suites");
        Ok(suites)
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    async fn add_label(&self, pr_number: u64, label: &str) -> Result<()> {
        debug!(pr_number, label, "adding label");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(pr_number, &[label.to_string()])
            .await?;
        debug!(pr_number, label, "added label");
        Ok(())
    }

    async fn close_pr(&self, pr_number: u64) -> Result<()> {
        debug!(pr_number, "closing PR");
        let response = self
            .request(Method::PATCH, &format!("pulls/{pr_number}"))
            .json(&serde_json::json!({ "state": "closed" }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "Failed to close PR #{pr_number}: {}",
                response.status()
            )));
        }
        debug!(pr_number, "closed PR");
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
