//! GitHub pull request access.
//!
//! The resolver only needs two calls from the hosting API, expressed by the
//! [`PullRequestSource`] trait. [`GitHubClient`] implements it over the REST
//! API; tests substitute their own sources.

pub mod client;

pub use client::GitHubClient;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::CommitContext;
use crate::error::Result;

/// Read access to pull requests.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// List pull requests associated with the context's commit.
    async fn list_pull_requests_for_commit(&self, commit: &CommitContext)
        -> Result<Vec<PullRequest>>;

    /// Fetch a single pull request by number.
    async fn get_pull_request(&self, commit: &CommitContext, number: u64) -> Result<PullRequest>;
}

/// The subset of a GitHub pull request the action reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Label names in API order. A label without a name yields an empty string.
    #[must_use]
    pub fn label_names(&self) -> Vec<String> {
        self.labels
            .iter()
            .map(|label| label.name.clone().unwrap_or_default())
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub name: Option<String>,
}

impl Label {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
