//! Core types for review-gate
//!
//! These are the validated records produced at the platform boundary. Optional
//! fields in the platform's responses are normalized here: absent collections
//! become empty, absent identities are rejected by the platform layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository coordinates for the canonical repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoConfig {
    /// `owner/repo`, as the platform reports `full_name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// An open pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Login of the PR author
    pub author: String,
    /// `full_name` of the head repository (None when the fork was deleted)
    pub head_repo: Option<String>,
    /// Head commit SHA
    pub head_sha: String,
    /// Applied label names
    pub labels: Vec<String>,
    /// Logins of reviewers whose review is still requested
    pub requested_reviewers: Vec<String>,
}

/// An open PR whose listing entry could not be validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedPr {
    /// PR number
    pub number: u64,
    /// What was wrong with the entry
    pub reason: String,
}

/// Open PR listing, split into usable and unusable entries
#[derive(Debug, Clone, Default)]
pub struct OpenPrs {
    /// Validated PRs, in listing order
    pub valid: Vec<PullRequest>,
    /// Entries rejected during validation
    pub malformed: Vec<MalformedPr>,
}

impl OpenPrs {
    /// Total number of listed PRs
    pub fn len(&self) -> usize {
        self.valid.len() + self.malformed.len()
    }

    /// Whether the listing is empty
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty() && self.malformed.is_empty()
    }
}

/// Review decision state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewState {
    /// Reviewer approved the changes
    Approved,
    /// Reviewer requested changes
    ChangesRequested,
    /// Reviewer left comments without a decision
    Commented,
    /// Review has been started but not submitted
    Pending,
    /// A previous review was dismissed
    Dismissed,
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::ChangesRequested => write!(f, "changes-requested"),
            Self::Commented => write!(f, "commented"),
            Self::Pending => write!(f, "pending"),
            Self::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// A submitted review on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer login
    pub reviewer: String,
    /// Review state
    pub state: ReviewState,
    /// Submission time (None for pending reviews)
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A check run reported against a commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check name
    pub name: String,
    /// Conclusion (None while the run is in progress)
    pub conclusion: Option<String>,
}

/// A commit status reported against a commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitStatus {
    /// Status context (e.g. `ci/circleci: test`)
    pub context: String,
    /// State: `success`, `failure`, `error`, or `pending`
    pub state: String,
}

/// A comment on a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrComment {
    /// Comment ID
    pub id: u64,
    /// Login of the comment author
    pub author: String,
    /// Comment body text
    pub body: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the platform reports the PR as merged
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Human-readable outcome message from the platform
    pub message: Option<String>,
}

impl MergeResult {
    /// Whether the outcome message indicates success
    ///
    /// GitHub reports "Pull Request successfully merged"; any other message
    /// is treated as a failed merge.
    pub fn is_success(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|m| m.contains("successfully"))
    }
}
