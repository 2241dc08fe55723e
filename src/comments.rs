//! Bot comment lifecycle
//!
//! Keeps the bot's own comments on a PR from piling up. Comments are
//! recognized by author login plus a hidden marker in the body, which acts
//! as the comment's kind.

use crate::platform::PlatformService;
use crate::types::PrComment;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Marker embedded in merge success comments
pub const SUCCESS_MARKER: &str = "<!-- review-gate:merged -->";

/// Marker embedded in failed-merge comments
pub const FAILURE_MARKER: &str = "<!-- review-gate:merge-failed -->";

/// Marker embedded in reviewer reminder comments
pub const REMINDER_MARKER: &str = "<!-- review-gate:reminder -->";

/// Which of the bot's comments to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Keep only the newest comment carrying `marker`
    RetainLatest {
        /// Body marker identifying the comment kind
        marker: &'static str,
    },
    /// Delete comments carrying `marker` older than `max_age`
    ExpireAfter {
        /// Body marker identifying the comment kind
        marker: &'static str,
        /// Maximum age
        max_age: Duration,
    },
}

impl CleanupPolicy {
    /// Retain only the latest success notice
    pub const fn success_notices() -> Self {
        Self::RetainLatest {
            marker: SUCCESS_MARKER,
        }
    }

    /// Expire reminders older than `max_age`
    pub const fn reminders(max_age: Duration) -> Self {
        Self::ExpireAfter {
            marker: REMINDER_MARKER,
            max_age,
        }
    }

    const fn marker(&self) -> &'static str {
        match self {
            Self::RetainLatest { marker } | Self::ExpireAfter { marker, .. } => *marker,
        }
    }
}

/// Select the comments to delete (PURE - no I/O)
///
/// Only comments authored by `bot_login` (case-insensitive) whose body
/// contains the policy's marker are candidates. `comments` is assumed to be
/// oldest first; equal timestamps keep that order.
#[must_use]
pub fn plan_cleanup(
    comments: &[PrComment],
    bot_login: &str,
    policy: &CleanupPolicy,
    now: DateTime<Utc>,
) -> Vec<u64> {
    let marker = policy.marker();
    let mut candidates: Vec<&PrComment> = comments
        .iter()
        .filter(|c| c.author.eq_ignore_ascii_case(bot_login) && c.body.contains(marker))
        .collect();

    match policy {
        CleanupPolicy::RetainLatest { .. } => {
            candidates.sort_by_key(|c| c.created_at);
            let keep = candidates.len().saturating_sub(1);
            candidates[..keep].iter().map(|c| c.id).collect()
        }
        CleanupPolicy::ExpireAfter { max_age, .. } => candidates
            .into_iter()
            .filter(|c| now - c.created_at > *max_age)
            .map(|c| c.id)
            .collect(),
    }
}

/// Outcome of pruning one PR's comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Comments deleted (or that would be, in a dry run)
    pub deleted: Vec<u64>,
    /// Comments whose deletion failed
    pub failed: Vec<u64>,
}

/// Delete the comments `plan_cleanup` selects from `comments`
///
/// Deletion is best-effort per comment: a failure is recorded in the report
/// and the remaining comments are still processed.
pub async fn prune_comments(
    platform: &dyn PlatformService,
    pr_number: u64,
    comments: &[PrComment],
    bot_login: &str,
    policy: &CleanupPolicy,
    now: DateTime<Utc>,
    dry_run: bool,
) -> CleanupReport {
    let to_delete = plan_cleanup(comments, bot_login, policy, now);
    debug!(pr_number, candidates = to_delete.len(), ?policy, "planned comment cleanup");

    let mut report = CleanupReport::default();
    for comment_id in to_delete {
        if dry_run {
            info!(pr_number, comment_id, "would delete stale comment");
            report.deleted.push(comment_id);
            continue;
        }
        match platform.delete_comment(comment_id).await {
            Ok(()) => {
                info!(pr_number, comment_id, "deleted stale comment");
                report.deleted.push(comment_id);
            }
            Err(e) => {
                warn!(pr_number, comment_id, error = %e, "failed to delete comment");
                report.failed.push(comment_id);
            }
        }
    }
    report
}

/// Hidden tag naming the reviewer a reminder is addressed to
pub fn reviewer_tag(login: &str) -> String {
    format!("<!-- review-gate:reviewer={} -->", login.to_lowercase())
}

/// Lowercased logins that already have a live reminder among `comments`
///
/// Comments in `excluded` (e.g. ones just selected for expiry) are ignored.
pub fn reminded_reviewers(
    comments: &[PrComment],
    bot_login: &str,
    excluded: &[u64],
) -> HashSet<String> {
    const PREFIX: &str = "<!-- review-gate:reviewer=";
    comments
        .iter()
        .filter(|c| !excluded.contains(&c.id))
        .filter(|c| c.author.eq_ignore_ascii_case(bot_login) && c.body.contains(REMINDER_MARKER))
        .filter_map(|c| {
            let start = c.body.find(PREFIX)? + PREFIX.len();
            let end = c.body[start..].find(" -->")? + start;
            Some(c.body[start..end].to_string())
        })
        .collect()
}
