//! # Label Resolution
//!
//! Finds the labels of the pull request behind a commit, tolerating two
//! eventual-consistency windows on GitHub's side:
//!
//! - the commit may not be associated with its PR yet, and
//! - a PR merged moments ago may report no labels until they propagate.
//!
//! Both cases are retried a bounded number of times with a fixed delay. A PR
//! that was merged a while ago and has no labels is taken at its word.
//! API failures are never retried and propagate to the caller.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use crate::config::CommitContext;
use crate::error::Result;
use crate::github::{PullRequest, PullRequestSource};

/// Retry settings for label resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
    /// How long after a merge an empty label list is treated as not yet propagated
    pub just_merged_window: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1500),
            just_merged_window: Duration::from_secs(10),
        }
    }
}

/// Resolves raw label names for a commit.
pub struct LabelResolver<S> {
    source: S,
    policy: RetryPolicy,
    clock: fn() -> DateTime<Utc>,
}

impl<S: PullRequestSource> LabelResolver<S> {
    pub fn new(source: S, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            clock: Utc::now,
        }
    }

    /// Replace the wall clock used for the just-merged check.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Return the label names of the first PR associated with the commit.
    ///
    /// An empty list means no PR was found or the PR has no labels.
    ///
    /// # Errors
    ///
    /// Returns the source's error unchanged if any API call fails.
    #[instrument(skip_all, fields(sha = %commit.sha))]
    pub async fn resolve(&self, commit: &CommitContext) -> Result<Vec<String>> {
        let max_attempts = self.policy.max_attempts.max(1);
        let delay_ms = self.policy.delay.as_millis();

        for attempt in 1..=max_attempts {
            let attempts_remain = attempt < max_attempts;
            debug!("Attempt {attempt}/{max_attempts} to fetch PR for commit {}", commit.sha);

            let pulls = self.source.list_pull_requests_for_commit(commit).await?;
            let Some(found) = pulls.first() else {
                if attempts_remain {
                    warn!(
                        "No PR found for commit {} yet, retrying in {delay_ms}ms (attempt {attempt}/{max_attempts})",
                        commit.sha
                    );
                    sleep(self.policy.delay).await;
                    continue;
                }
                warn!(
                    "No PR found after {max_attempts} attempts for commit {}",
                    commit.sha
                );
                return Ok(Vec::new());
            };

            info!("Found PR #{} for commit {}", found.number, commit.sha);
            let pr = self.source.get_pull_request(commit, found.number).await?;

            if !pr.labels.is_empty() {
                let names = pr.label_names();
                info!("Found {} labels on PR #{}", names.len(), pr.number);
                return Ok(names);
            }

            if self.just_merged(&pr) && attempts_remain {
                warn!(
                    "PR #{} was just merged and has no labels yet, retrying in {delay_ms}ms (attempt {attempt}/{max_attempts})",
                    pr.number
                );
                sleep(self.policy.delay).await;
                continue;
            }

            info!("PR #{} has no labels", pr.number);
            return Ok(Vec::new());
        }

        Ok(Vec::new())
    }

    fn just_merged(&self, pr: &PullRequest) -> bool {
        let Some(merged_at) = pr.merged_at else {
            return false;
        };
        let age_ms = (self.clock)()
            .signed_duration_since(merged_at)
            .num_milliseconds();
        let window_ms = i64::try_from(self.policy.just_merged_window.as_millis()).unwrap_or(i64::MAX);
        age_ms < window_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabelsError;
    use crate::github::Label;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn commit() -> CommitContext {
        CommitContext::new("test-owner", "test-repo", "abc123")
    }

    fn pr(number: u64, labels: &[&str], merged_secs_ago: Option<i64>) -> PullRequest {
        PullRequest {
            number,
            labels: labels.iter().map(|name| Label::named(*name)).collect(),
            merged_at: merged_secs_ago.map(|secs| fixed_now() - chrono::Duration::seconds(secs)),
        }
    }

    // Scripted source: each call pops the next response; the last one repeats.
    struct ScriptedSource {
        lists: Mutex<VecDeque<Vec<PullRequest>>>,
        details: Mutex<VecDeque<PullRequest>>,
        list_calls: AtomicUsize,
        detail_calls: AtomicUsize,
        fail_list: bool,
    }

    impl ScriptedSource {
        fn new(lists: Vec<Vec<PullRequest>>, details: Vec<PullRequest>) -> Self {
            Self {
                lists: Mutex::new(lists.into()),
                details: Mutex::new(details.into()),
                list_calls: AtomicUsize::new(0),
                detail_calls: AtomicUsize::new(0),
                fail_list: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail_list: true,
                ..Self::new(vec![], vec![])
            }
        }

        fn next<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
            let mut queue = queue.lock().unwrap();
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        }
    }

    #[async_trait]
    impl PullRequestSource for ScriptedSource {
        async fn list_pull_requests_for_commit(
            &self,
            _commit: &CommitContext,
        ) -> Result<Vec<PullRequest>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list {
                return Err(LabelsError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(Self::next(&self.lists).unwrap_or_default())
        }

        async fn get_pull_request(&self, _commit: &CommitContext, number: u64) -> Result<PullRequest> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::next(&self.details).unwrap_or(PullRequest {
                number,
                ..PullRequest::default()
            }))
        }
    }

    fn resolver(source: ScriptedSource) -> LabelResolver<ScriptedSource> {
        LabelResolver::new(source, RetryPolicy::default()).with_clock(fixed_now)
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_labels_on_first_attempt() {
        let source = ScriptedSource::new(
            vec![vec![pr(1, &[], None)]],
            vec![pr(1, &["bug", "enhancement"], Some(3600))],
        );
        let resolver = resolver(source);

        let labels = resolver.resolve(&commit()).await.unwrap();

        assert_eq!(labels, vec!["bug".to_string(), "enhancement".to_string()]);
        assert_eq!(resolver.source().list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.source().detail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pr_exhausts_attempts() {
        let resolver = resolver(ScriptedSource::new(vec![vec![]], vec![]));
        let started = tokio::time::Instant::now();

        let labels = resolver.resolve(&commit()).await.unwrap();

        assert!(labels.is_empty());
        assert_eq!(resolver.source().list_calls.load(Ordering::SeqCst), 3);
        assert_eq!(resolver.source().detail_calls.load(Ordering::SeqCst), 0);
        // Two pauses between three attempts
        assert_eq!(started.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pr_appears_on_later_attempt() {
        let source = ScriptedSource::new(
            vec![vec![], vec![pr(5, &[], None)]],
            vec![pr(5, &["documentation"], None)],
        );
        let resolver = resolver(source);

        let labels = resolver.resolve(&commit()).await.unwrap();

        assert_eq!(labels, vec!["documentation".to_string()]);
        assert_eq!(resolver.source().list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_old_merge_without_labels_returns_immediately() {
        let source = ScriptedSource::new(vec![vec![pr(2, &[], None)]], vec![pr(2, &[], Some(60))]);
        let resolver = resolver(source);
        let started = tokio::time::Instant::now();

        let labels = resolver.resolve(&commit()).await.unwrap();

        assert!(labels.is_empty());
        assert_eq!(resolver.source().list_calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmerged_without_labels_returns_immediately() {
        let source = ScriptedSource::new(vec![vec![pr(2, &[], None)]], vec![pr(2, &[], None)]);
        let resolver = resolver(source);

        assert!(resolver.resolve(&commit()).await.unwrap().is_empty());
        assert_eq!(resolver.source().list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_just_merged_without_labels_retries() {
        let source = ScriptedSource::new(
            vec![vec![pr(3, &[], None)]],
            vec![pr(3, &[], Some(2)), pr(3, &["bug"], Some(2))],
        );
        let resolver = resolver(source);
        let started = tokio::time::Instant::now();

        let labels = resolver.resolve(&commit()).await.unwrap();

        assert_eq!(labels, vec!["bug".to_string()]);
        assert_eq!(resolver.source().list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.source().detail_calls.load(Ordering::SeqCst), 2);
        assert_eq!(started.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_just_merged_gives_up_after_last_attempt() {
        let source = ScriptedSource::new(vec![vec![pr(3, &[], None)]], vec![pr(3, &[], Some(1))]);
        let resolver = resolver(source);

        assert!(resolver.resolve(&commit()).await.unwrap().is_empty());
        assert_eq!(resolver.source().detail_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_and_attempts_are_configurable() {
        let policy = RetryPolicy {
            max_attempts: 4,
            delay: Duration::from_millis(3000),
            ..RetryPolicy::default()
        };
        let resolver =
            LabelResolver::new(ScriptedSource::new(vec![vec![]], vec![]), policy).with_clock(fixed_now);
        let started = tokio::time::Instant::now();

        assert!(resolver.resolve(&commit()).await.unwrap().is_empty());
        assert_eq!(resolver.source().list_calls.load(Ordering::SeqCst), 4);
        assert_eq!(started.elapsed(), Duration::from_millis(9000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_never_sleeps() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };
        let source = ScriptedSource::new(vec![vec![pr(9, &[], None)]], vec![pr(9, &[], Some(0))]);
        let resolver = LabelResolver::new(source, policy).with_clock(fixed_now);
        let started = tokio::time::Instant::now();

        assert!(resolver.resolve(&commit()).await.unwrap().is_empty());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_api_error_propagates_without_retry() {
        let resolver = resolver(ScriptedSource::failing());

        let err = resolver.resolve(&commit()).await.unwrap_err();

        assert!(matches!(err, LabelsError::Api { status: 500, .. }));
        assert_eq!(resolver.source().list_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_just_merged_window_boundary() {
        let resolver = resolver(ScriptedSource::new(vec![], vec![]));
        assert!(resolver.just_merged(&pr(1, &[], Some(9))));
        assert!(!resolver.just_merged(&pr(1, &[], Some(10))));
        assert!(!resolver.just_merged(&pr(1, &[], None)));
        // Clock skew: a merge timestamp in the future counts as just merged
        assert!(resolver.just_merged(&pr(1, &[], Some(-5))));
    }
}
