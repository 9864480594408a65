//! Action configuration.
//!
//! GitHub Actions passes inputs as `INPUT_<NAME>` environment variables and
//! the run context as `GITHUB_*` variables. [`ActionArgs`] reads both (with
//! command-line flags for local runs) and [`Config::from_args`] validates them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{LabelsError, Result};
use crate::resolver::RetryPolicy;

/// Public GitHub REST endpoint, used when `GITHUB_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Raw inputs as supplied by the runner or the command line.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "pr-labels")]
#[command(about = "Expose the labels of the pull request behind a commit as step outputs")]
#[command(version)]
pub struct ActionArgs {
    /// Token used to query the GitHub API
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Number of attempts before giving up on finding a PR or its labels
    #[arg(long, env = "INPUT_MAX-ATTEMPTS")]
    pub max_attempts: Option<String>,

    /// Delay between attempts, in milliseconds
    #[arg(long, env = "INPUT_RETRY-DELAY-MS")]
    pub retry_delay_ms: Option<String>,

    /// Repository in owner/repo format
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Commit SHA that triggered the workflow
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// File receiving exported environment variables
    #[arg(long, env = "GITHUB_ENV")]
    pub env_file: Option<PathBuf>,

    /// File receiving step outputs
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Enable debug logging for all targets
    #[arg(short, long)]
    pub verbose: bool,
}

/// Repository and commit the action runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitContext {
    pub owner: String,
    pub repo: String,
    pub sha: String,
}

impl CommitContext {
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            sha: sha.into(),
        }
    }

    /// Build a context from an `owner/repo` slug and a commit SHA.
    ///
    /// # Errors
    ///
    /// Returns [`LabelsError::InvalidRepository`] if the slug is malformed.
    pub fn from_slug(slug: &str, sha: impl Into<String>) -> Result<Self> {
        match slug.trim().split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
                Ok(Self::new(owner, repo, sha))
            }
            _ => Err(LabelsError::InvalidRepository(slug.to_string())),
        }
    }
}

/// Validated configuration for a single run.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub commit: CommitContext,
    pub retry: RetryPolicy,
    pub env_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
}

impl Config {
    /// Validate raw inputs.
    ///
    /// Blank inputs are treated as not supplied, matching how the runner
    /// exposes optional inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the token, repository or SHA is missing, or if a
    /// numeric input does not parse.
    pub fn from_args(args: &ActionArgs) -> Result<Self> {
        let token = non_blank(args.github_token.as_deref())
            .ok_or_else(|| LabelsError::MissingInput("github-token".to_string()))?;
        let repository = non_blank(args.repository.as_deref())
            .ok_or_else(|| LabelsError::MissingInput("GITHUB_REPOSITORY".to_string()))?;
        let sha = non_blank(args.sha.as_deref())
            .ok_or_else(|| LabelsError::MissingInput("GITHUB_SHA".to_string()))?;

        let defaults = RetryPolicy::default();
        let max_attempts = parse_input("max-attempts", args.max_attempts.as_deref())?
            .unwrap_or(defaults.max_attempts);
        if max_attempts == 0 {
            return Err(LabelsError::InvalidInput {
                name: "max-attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        let delay = parse_input::<u64>("retry-delay-ms", args.retry_delay_ms.as_deref())?
            .map_or(defaults.delay, Duration::from_millis);

        let api_url = non_blank(args.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            token: token.to_string(),
            api_url,
            commit: CommitContext::from_slug(repository, sha)?,
            retry: RetryPolicy {
                max_attempts,
                delay,
                ..defaults
            },
            env_file: args.env_file.clone().filter(|p| !p.as_os_str().is_empty()),
            output_file: args.output_file.clone().filter(|p| !p.as_os_str().is_empty()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_input<T>(name: &str, value: Option<&str>) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    non_blank(value)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| LabelsError::InvalidInput {
                name: name.to_string(),
                message: format!("'{raw}': {e}"),
            })
        })
        .transpose()
}
