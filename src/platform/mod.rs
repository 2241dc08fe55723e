//! Platform services
//!
//! Every call review-gate makes against the hosting platform goes through
//! [`PlatformService`], so the decision logic can be driven by a mock in tests.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    CheckRun, CommitStatus, MergeResult, OpenPrs, PrComment, RepoConfig, Review,
};
use async_trait::async_trait;

/// Platform service trait for pull request operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List open pull requests
    ///
    /// Entries that fail validation are returned in `malformed` rather than
    /// failing the whole listing.
    async fn list_open_prs(&self) -> Result<OpenPrs>;

    /// List submitted reviews on a PR, in the order the platform returns them
    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>>;

    /// List logins whose review is currently requested on a PR
    async fn list_requested_reviewers(&self, pr_number: u64) -> Result<Vec<String>>;

    /// List check runs reported against a commit
    async fn list_check_runs(&self, sha: &str) -> Result<Vec<CheckRun>>;

    /// List commit statuses reported against a commit
    async fn list_commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>>;

    /// List logins of repository collaborators
    async fn list_collaborators(&self) -> Result<Vec<String>>;

    /// List comments on a PR, oldest first
    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>>;

    /// Create a comment on a PR, returning its ID
    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<u64>;

    /// Delete a comment by ID
    async fn delete_comment(&self, comment_id: u64) -> Result<()>;

    /// Merge a PR, provided its head is still `sha`
    async fn merge_pr(&self, pr_number: u64, sha: &str) -> Result<MergeResult>;

    /// Canonical repository this service operates on
    fn repo(&self) -> &RepoConfig;
}
