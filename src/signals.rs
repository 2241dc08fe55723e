//! Signal collection
//!
//! Gathers everything the evaluator needs for one pull request. Each platform
//! call is bounded by a timeout and retried on transient failures; a call that
//! still fails aborts collection for this PR only.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{CheckRun, CommitStatus, PullRequest, RepoConfig, Review};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Timeout and retry settings for collection calls
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts per call (at least 1)
    pub attempts: u32,
    /// Bound on each attempt
    pub timeout: Duration,
    /// Delay before the first retry; doubled for each further retry
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: crate::config::DEFAULT_ATTEMPTS,
            timeout: crate::config::DEFAULT_TIMEOUT,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Run `call` under `policy`, retrying transient failures
pub async fn with_retry<T, F, Fut>(operation: &str, policy: &RetryPolicy, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        let outcome = tokio::time::timeout(policy.timeout, call())
            .await
            .unwrap_or_else(|_| {
                Err(Error::Timeout {
                    operation: operation.to_string(),
                    after: policy.timeout,
                })
            });

        match outcome {
            Err(e) if e.is_transient() && attempt < attempts => {
                let delay = policy.backoff.saturating_mul(1 << (attempt - 1).min(16));
                warn!(operation, attempt, error = %e, ?delay, "transient failure, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// Everything known about one pull request in this run
#[derive(Debug, Clone)]
pub struct SignalBundle {
    /// The pull request itself
    pub pr: PullRequest,
    /// Submitted reviews
    pub reviews: Vec<Review>,
    /// Logins whose review is still requested
    pub requested_reviewers: Vec<String>,
    /// Check runs on the head commit
    pub check_runs: Vec<CheckRun>,
    /// Commit statuses on the head commit
    pub statuses: Vec<CommitStatus>,
    /// Whether the PR comes from a repository other than the canonical one
    pub from_outside: bool,
}

/// Whether `pr` originates outside `canonical`
///
/// A PR whose head repository is gone (deleted fork) counts as outside.
pub fn is_outside(pr: &PullRequest, canonical: &RepoConfig) -> bool {
    let canonical = canonical.full_name();
    pr.head_repo
        .as_deref()
        .is_none_or(|name| !name.eq_ignore_ascii_case(&canonical))
}

/// Outstanding review requests on `pr`
///
/// The PR listing and the dedicated endpoint can disagree briefly; a login
/// reported by either one counts. Duplicates are dropped case-insensitively.
pub async fn collect_requested_reviewers(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    policy: &RetryPolicy,
) -> Result<Vec<String>> {
    let requested = with_retry("list requested reviewers", policy, || {
        platform.list_requested_reviewers(pr.number)
    })
    .await?;

    let mut reviewers: Vec<String> = Vec::new();
    for login in pr.requested_reviewers.iter().chain(requested.iter()) {
        if !reviewers.iter().any(|seen| seen.eq_ignore_ascii_case(login)) {
            reviewers.push(login.clone());
        }
    }
    Ok(reviewers)
}

/// Collect all signals for `pr`
pub async fn collect_signals(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    policy: &RetryPolicy,
) -> Result<SignalBundle> {
    let number = pr.number;
    let sha = pr.head_sha.as_str();

    let reviews = with_retry("list reviews", policy, || platform.list_reviews(number)).await?;
    let requested_reviewers = collect_requested_reviewers(platform, pr, policy).await?;
    let check_runs = with_retry("list check runs", policy, || platform.list_check_runs(sha)).await?;
    let statuses = with_retry("list commit statuses", policy, || {
        platform.list_commit_statuses(sha)
    })
    .await?;

    let from_outside = is_outside(pr, platform.repo());

    debug!(
        pr_number = number,
        reviews = reviews.len(),
        requested = requested_reviewers.len(),
        check_runs = check_runs.len(),
        statuses = statuses.len(),
        from_outside,
        "collected signals"
    );

    Ok(SignalBundle {
        pr: pr.clone(),
        reviews,
        requested_reviewers,
        check_runs,
        statuses,
        from_outside,
    })
}
