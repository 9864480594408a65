//! Pull request labels for GitHub Actions workflows.
//!
//! Given the commit that triggered a workflow, this crate finds the pull
//! request associated with it, reads its labels and publishes them for later
//! steps:
//!
//! - `labels` output: identifiers joined by spaces, with a leading and trailing
//!   space (`" bug needs-review "`), so `contains(..., ' bug ')` is exact
//! - `labels-object` output: `{"bug": true, "needs-review": true}`
//! - one `GITHUB_PR_LABEL_<NAME>=1` environment variable per label
//!
//! # Architecture
//!
//! - [`resolver::LabelResolver`] polls a [`github::PullRequestSource`] with
//!   bounded retries
//! - [`normalize`] maps raw label names to identifiers and variable names
//! - [`action::publish_labels`] writes everything through a
//!   [`workflow::WorkflowSink`]
//!
//! The GitHub client and the runner file commands are plain trait
//! implementations, so the whole flow runs in tests without network access.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod config;
pub mod error;
pub mod github;
pub mod labels;
pub mod normalize;
pub mod resolver;
pub mod workflow;

pub use action::{publish_labels, run, LabelOutputs};
pub use config::{ActionArgs, CommitContext, Config};
pub use error::{LabelsError, Result};
pub use github::{GitHubClient, Label, PullRequest, PullRequestSource};
pub use labels::LabelSet;
pub use resolver::{LabelResolver, RetryPolicy};
pub use workflow::{FileCommandSink, WorkflowSink};
