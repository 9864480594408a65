//! # GitHub REST Client
//!
//! Minimal client for the two pull request endpoints the action needs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{PullRequest, PullRequestSource};
use crate::config::CommitContext;
use crate::error::{LabelsError, Result};

const USER_AGENT_VALUE: &str = concat!("pr-labels/", env!("CARGO_PKG_VERSION"));

/// GitHub API client authenticated with a token.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct GitHubError {
    message: String,
}

impl GitHubClient {
    /// Create a new client against `base_url` (e.g. `https://api.github.com`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GitHubError>(&body)
                .map_or(body, |error| error.message);
            return Err(LabelsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    #[instrument(skip(self, commit), fields(sha = %commit.sha))]
    async fn list_pull_requests_for_commit(
        &self,
        commit: &CommitContext,
    ) -> Result<Vec<PullRequest>> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/pulls",
            self.base_url, commit.owner, commit.repo, commit.sha
        );
        let pulls: Vec<PullRequest> = self.get_json(&url).await?;
        debug!("Retrieved {} pull requests for commit {}", pulls.len(), commit.sha);
        Ok(pulls)
    }

    #[instrument(skip(self, commit), fields(pr_number = %number))]
    async fn get_pull_request(&self, commit: &CommitContext, number: u64) -> Result<PullRequest> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_url, commit.owner, commit.repo, number
        );
        let pr: PullRequest = self.get_json(&url).await?;
        debug!("Retrieved {} labels for PR #{}", pr.labels.len(), number);
        Ok(pr)
    }
}
