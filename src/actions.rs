//! Action execution - effectful operations
//!
//! Takes a verdict (or a set of requested reviewers) and performs the
//! corresponding platform calls: merge plus result comment, or reminders.

use crate::comments::{FAILURE_MARKER, REMINDER_MARKER, SUCCESS_MARKER, reviewer_tag};
use crate::error::Error;
use crate::platform::PlatformService;
use crate::types::{PullRequest, RepoConfig};
use tracing::{info, warn};

/// Web host used for review queue links
pub const DEFAULT_WEB_BASE: &str = "https://github.com";

/// Outcome of a merge attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The platform reported a successful merge
    Merged {
        /// Merge commit SHA, when reported
        sha: Option<String>,
    },
    /// The platform refused or failed the merge
    Rejected {
        /// Platform message or error text
        message: String,
    },
    /// Dry run: nothing was done
    Skipped,
}

impl MergeOutcome {
    /// Whether the PR was merged
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// Comment posted after a successful merge
pub fn success_body(pr: &PullRequest) -> String {
    format!(
        "Merged. Thanks for the contribution, @{}!\n\n{SUCCESS_MARKER}",
        pr.author
    )
}

/// Comment posted when the merge did not go through
pub fn failure_body(message: &str) -> String {
    format!("I could not merge this pull request: {message}\n\n{FAILURE_MARKER}")
}

/// Reminder addressed to one requested reviewer
pub fn reminder_body(web_base: &str, repo: &RepoConfig, reviewer: &str) -> String {
    let queue = format!(
        "{}/{}/{}/pulls/review-requested/{}",
        web_base.trim_end_matches('/'),
        repo.owner,
        repo.repo,
        urlencoding::encode(reviewer)
    );
    format!(
        "@{reviewer}, your review is requested on this pull request.\n\n\
         [All pull requests awaiting review from @{reviewer}]({queue})\n\n\
         {}\n{REMINDER_MARKER}",
        reviewer_tag(reviewer)
    )
}

/// Outcome of a merge plus the fate of its result comment
#[derive(Debug)]
pub struct MergeAttempt {
    /// What happened to the PR
    pub outcome: MergeOutcome,
    /// Set when the result comment could not be posted
    pub comment_error: Option<Error>,
}

/// Merge a ready PR at its evaluated head and post the result comment
///
/// A rejected merge is an outcome, not an error: it is logged and answered
/// with a "could not merge" comment. A failure to post the comment is
/// reported alongside the outcome.
pub async fn execute_merge(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    dry_run: bool,
) -> MergeAttempt {
    if dry_run {
        info!(pr_number = pr.number, "dry run: would merge");
        return MergeAttempt {
            outcome: MergeOutcome::Skipped,
            comment_error: None,
        };
    }

    info!(pr_number = pr.number, title = %pr.title, sha = %pr.head_sha, "merging");
    let merged = match platform.merge_pr(pr.number, &pr.head_sha).await {
        Ok(result) if result.is_success() => Ok(result.sha),
        Ok(result) => Err(result
            .message
            .unwrap_or_else(|| "merge was not performed".to_string())),
        Err(e) => Err(e.to_string()),
    };
    let (outcome, body) = match merged {
        Ok(sha) => {
            info!(pr_number = pr.number, sha = ?sha, "merged");
            (MergeOutcome::Merged { sha }, success_body(pr))
        }
        Err(message) => {
            warn!(pr_number = pr.number, %message, "could not merge");
            let body = failure_body(&message);
            (MergeOutcome::Rejected { message }, body)
        }
    };

    let comment_error = platform.create_pr_comment(pr.number, &body).await.err();
    if let Some(ref e) = comment_error {
        warn!(pr_number = pr.number, error = %e, "failed to post merge result comment");
    }
    MergeAttempt {
        outcome,
        comment_error,
    }
}

/// Result of posting reminders on one PR
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderReport {
    /// Reviewers reminded (or that would be, in a dry run)
    pub posted: Vec<String>,
    /// Reviewers skipped because a live reminder already exists
    pub skipped: Vec<String>,
    /// Reviewers whose reminder could not be posted
    pub failed: Vec<String>,
}

/// Post one reminder per requested reviewer
///
/// Reviewers listed in `already_reminded` (lowercased) are skipped. Each
/// reminder is independent; a failed post does not stop the others.
pub async fn post_reminders(
    platform: &dyn PlatformService,
    web_base: &str,
    pr_number: u64,
    reviewers: &[String],
    already_reminded: &std::collections::HashSet<String>,
    dry_run: bool,
) -> ReminderReport {
    let mut report = ReminderReport::default();

    for reviewer in reviewers {
        if already_reminded.contains(&reviewer.to_lowercase()) {
            report.skipped.push(reviewer.clone());
            continue;
        }
        if dry_run {
            info!(pr_number, %reviewer, "dry run: would remind reviewer");
            report.posted.push(reviewer.clone());
            continue;
        }

        let body = reminder_body(web_base, platform.repo(), reviewer);
        match platform.create_pr_comment(pr_number, &body).await {
            Ok(comment_id) => {
                info!(pr_number, %reviewer, comment_id, "reminded reviewer");
                report.posted.push(reviewer.clone());
            }
            Err(e) => {
                warn!(pr_number, %reviewer, error = %e, "failed to post reminder");
                report.failed.push(reviewer.clone());
            }
        }
    }

    report
}
