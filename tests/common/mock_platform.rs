//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use review_gate::error::{Error, Result};
use review_gate::platform::PlatformService;
use review_gate::types::{
    CheckRun, CommitStatus, MalformedPr, MergeResult, OpenPrs, PrComment, PullRequest, RepoConfig,
    Review,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub pr_number: u64,
    pub sha: String,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable responses per PR / commit
/// - Call tracking for verification
/// - Error injection per PR, commit, or comment
pub struct MockPlatformService {
    repo: RepoConfig,
    next_comment_id: AtomicU64,
    // Responses
    open_prs: Mutex<Vec<PullRequest>>,
    malformed_prs: Mutex<Vec<MalformedPr>>,
    collaborators: Mutex<Vec<String>>,
    reviews: Mutex<HashMap<u64, Vec<Review>>>,
    requested_reviewers: Mutex<HashMap<u64, Vec<String>>>,
    check_runs: Mutex<HashMap<String, Vec<CheckRun>>>,
    statuses: Mutex<HashMap<String, Vec<CommitStatus>>>,
    comments: Mutex<HashMap<u64, Vec<PrComment>>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    delete_comment_calls: Mutex<Vec<u64>>,
    merge_pr_calls: Mutex<Vec<MergeCall>>,
    list_collaborators_calls: AtomicU64,
    // Error injection
    error_on_list_prs: Mutex<Option<String>>,
    error_on_reviews: Mutex<HashMap<u64, String>>,
    error_on_list_comments: Mutex<HashMap<u64, String>>,
    error_on_delete: Mutex<HashSet<u64>>,
    error_on_create_comment: Mutex<Option<String>>,
    error_on_merge: Mutex<HashMap<u64, String>>,
}

impl MockPlatformService {
    /// Create a new mock for the given repository
    pub fn with_repo(repo: RepoConfig) -> Self {
        Self {
            repo,
            next_comment_id: AtomicU64::new(1000),
            open_prs: Mutex::new(Vec::new()),
            malformed_prs: Mutex::new(Vec::new()),
            collaborators: Mutex::new(Vec::new()),
            reviews: Mutex::new(HashMap::new()),
            requested_reviewers: Mutex::new(HashMap::new()),
            check_runs: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            comments: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            delete_comment_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            list_collaborators_calls: AtomicU64::new(0),
            error_on_list_prs: Mutex::new(None),
            error_on_reviews: Mutex::new(HashMap::new()),
            error_on_list_comments: Mutex::new(HashMap::new()),
            error_on_delete: Mutex::new(HashSet::new()),
            error_on_create_comment: Mutex::new(None),
            error_on_merge: Mutex::new(HashMap::new()),
        }
    }

    // === Response setup ===

    /// Add an open PR to the listing
    pub fn add_pr(&self, pr: PullRequest) {
        self.open_prs.lock().unwrap().push(pr);
    }

    /// Add a listing entry that failed validation
    pub fn add_malformed_pr(&self, number: u64, reason: &str) {
        self.malformed_prs.lock().unwrap().push(MalformedPr {
            number,
            reason: reason.to_string(),
        });
    }

    /// Set the collaborator logins
    pub fn set_collaborators(&self, logins: &[&str]) {
        *self.collaborators.lock().unwrap() = logins.iter().map(ToString::to_string).collect();
    }

    /// Set the reviews for a PR
    pub fn set_reviews(&self, pr_number: u64, reviews: Vec<Review>) {
        self.reviews.lock().unwrap().insert(pr_number, reviews);
    }

    /// Set the requested reviewers returned by the dedicated endpoint
    pub fn set_requested_reviewers(&self, pr_number: u64, logins: &[&str]) {
        self.requested_reviewers
            .lock()
            .unwrap()
            .insert(pr_number, logins.iter().map(ToString::to_string).collect());
    }

    /// Set the check runs for a commit
    pub fn set_check_runs(&self, sha: &str, runs: Vec<CheckRun>) {
        self.check_runs.lock().unwrap().insert(sha.to_string(), runs);
    }

    /// Set the commit statuses for a commit
    pub fn set_statuses(&self, sha: &str, statuses: Vec<CommitStatus>) {
        self.statuses
            .lock()
            .unwrap()
            .insert(sha.to_string(), statuses);
    }

    /// Set the existing comments on a PR
    pub fn set_comments(&self, pr_number: u64, comments: Vec<PrComment>) {
        self.comments.lock().unwrap().insert(pr_number, comments);
    }

    /// Set the merge response for a PR
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    // === Error injection methods ===

    /// Make `list_open_prs` return an error
    pub fn fail_list_prs(&self, msg: &str) {
        *self.error_on_list_prs.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_reviews` fail for a PR
    pub fn fail_reviews(&self, pr_number: u64, msg: &str) {
        self.error_on_reviews
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    /// Make `list_pr_comments` fail for a PR
    pub fn fail_list_comments(&self, pr_number: u64, msg: &str) {
        self.error_on_list_comments
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    /// Make `delete_comment` fail for a comment
    pub fn fail_delete(&self, comment_id: u64) {
        self.error_on_delete.lock().unwrap().insert(comment_id);
    }

    /// Make every `create_pr_comment` fail
    pub fn fail_create_comment(&self, msg: &str) {
        *self.error_on_create_comment.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `merge_pr` return an error for a PR
    pub fn fail_merge(&self, pr_number: u64, msg: &str) {
        self.error_on_merge
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    // === Call verification methods ===

    /// Get all `create_pr_comment` calls
    pub fn get_create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    /// Get all comment IDs passed to `delete_comment`
    pub fn get_delete_comment_calls(&self) -> Vec<u64> {
        self.delete_comment_calls.lock().unwrap().clone()
    }

    /// Get all `merge_pr` calls
    pub fn get_merge_calls(&self) -> Vec<MergeCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Get all PR numbers passed to `merge_pr`
    pub fn get_merge_pr_calls(&self) -> Vec<u64> {
        self.get_merge_calls().iter().map(|c| c.pr_number).collect()
    }

    /// Number of times collaborators were listed
    pub fn collaborator_fetch_count(&self) -> u64 {
        self.list_collaborators_calls.load(Ordering::SeqCst)
    }

    /// Assert that `merge_pr` was called for a specific PR
    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            calls.contains(&pr_number),
            "Expected merge_pr({pr_number}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was NOT called for a specific PR
    pub fn assert_merge_not_called(&self, pr_number: u64) {
        let calls = self.get_merge_pr_calls();
        assert!(
            !calls.contains(&pr_number),
            "Expected merge_pr({pr_number}) NOT to be called but it was: {calls:?}"
        );
    }

    /// Comment bodies posted on a PR
    pub fn comments_posted_on(&self, pr_number: u64) -> Vec<String> {
        self.get_create_comment_calls()
            .into_iter()
            .filter(|c| c.pr_number == pr_number)
            .map(|c| c.body)
            .collect()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_prs(&self) -> Result<OpenPrs> {
        if let Some(msg) = self.error_on_list_prs.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(OpenPrs {
            valid: self.open_prs.lock().unwrap().clone(),
            malformed: self.malformed_prs.lock().unwrap().clone(),
        })
    }

    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>> {
        if let Some(msg) = self.error_on_reviews.lock().unwrap().get(&pr_number) {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_requested_reviewers(&self, pr_number: u64) -> Result<Vec<String>> {
        Ok(self
            .requested_reviewers
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_check_runs(&self, sha: &str) -> Result<Vec<CheckRun>> {
        Ok(self
            .check_runs
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_collaborators(&self) -> Result<Vec<String>> {
        self.list_collaborators_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.collaborators.lock().unwrap().clone())
    }

    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        if let Some(msg) = self.error_on_list_comments.lock().unwrap().get(&pr_number) {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<u64> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                pr_number,
                body: body.to_string(),
            });

        if let Some(msg) = self.error_on_create_comment.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.next_comment_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn delete_comment(&self, comment_id: u64) -> Result<()> {
        self.delete_comment_calls.lock().unwrap().push(comment_id);

        if self.error_on_delete.lock().unwrap().contains(&comment_id) {
            return Err(Error::Platform(format!("cannot delete {comment_id}")));
        }
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, sha: &str) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergeCall {
            pr_number,
            sha: sha.to_string(),
        });

        if let Some(msg) = self.error_on_merge.lock().unwrap().get(&pr_number) {
            return Err(Error::Platform(msg.clone()));
        }

        let responses = self.merge_responses.lock().unwrap();
        Ok(responses.get(&pr_number).cloned().unwrap_or(MergeResult {
            merged: true,
            sha: Some(format!("merged_sha_{pr_number}")),
            message: Some("Pull Request successfully merged".to_string()),
        }))
    }

    fn repo(&self) -> &RepoConfig {
        &self.repo
    }
}
