//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    CheckRun, CommitStatus, MalformedPr, MergeResult, OpenPrs, PrComment, PullRequest, RepoConfig,
    Review, ReviewState,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Public GitHub API
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const PER_PAGE: u8 = 100;

// Response types for the endpoints queried with raw requests

#[derive(Deserialize)]
struct RequestedReviewersResponse {
    #[serde(default)]
    users: Vec<Login>,
}

#[derive(Deserialize)]
struct Login {
    login: String,
}

#[derive(Deserialize)]
struct CheckRunsResponse {
    total_count: Option<usize>,
    #[serde(default)]
    check_runs: Vec<RawCheckRun>,
}

#[derive(Deserialize)]
struct RawCheckRun {
    name: String,
    conclusion: Option<String>,
}

#[derive(Deserialize)]
struct CombinedStatus {
    total_count: Option<usize>,
    #[serde(default)]
    statuses: Vec<RawStatus>,
}

#[derive(Deserialize)]
struct RawStatus {
    context: String,
    state: String,
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    repo: RepoConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests (checks, statuses, collaborators)
    http_client: Client,
    /// API base URL without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_base` overrides the public API (GitHub Enterprise uses
    /// `https://<host>/api/v3`). `timeout` bounds every raw HTTP request.
    pub fn new(
        token: &str,
        repo: RepoConfig,
        api_base: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_base = api_base
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
            .to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(&api_base)
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent(concat!("review-gate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            repo,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base, self.repo.owner, self.repo.repo, path
        )
    }

    /// GET a repository-scoped endpoint and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.repo_url(path);
        debug!(%url, "GET");

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?
            .error_for_status()?;

        response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("{path}: {e}")))
    }
}

/// Convert an octocrab PR into our validated record
fn pr_from_octocrab(
    pr: octocrab::models::pulls::PullRequest,
) -> std::result::Result<PullRequest, MalformedPr> {
    let author = pr.user.map(|u| u.login).ok_or_else(|| MalformedPr {
        number: pr.number,
        reason: "no author".to_string(),
    })?;

    Ok(PullRequest {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        author,
        head_repo: pr.head.repo.and_then(|r| r.full_name),
        head_sha: pr.head.sha,
        labels: pr
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|l| l.name)
            .collect(),
        requested_reviewers: pr
            .requested_reviewers
            .unwrap_or_default()
            .into_iter()
            .map(|u| u.login)
            .collect(),
    })
}

fn review_state_from_octocrab(state: &octocrab::models::pulls::ReviewState) -> ReviewState {
    use octocrab::models::pulls::ReviewState as Gh;
    match state {
        Gh::Approved => ReviewState::Approved,
        Gh::ChangesRequested => ReviewState::ChangesRequested,
        Gh::Commented => ReviewState::Commented,
        Gh::Dismissed => ReviewState::Dismissed,
        // Pending and any state added later carry no decision
        _ => ReviewState::Pending,
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_prs(&self) -> Result<OpenPrs> {
        debug!(repo = %self.repo, "listing open PRs");
        let page = self
            .client
            .pulls(&self.repo.owner, &self.repo.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(PER_PAGE)
            .send()
            .await?;
        let prs = self.client.all_pages(page).await?;

        let mut result = OpenPrs::default();
        for pr in prs {
            match pr_from_octocrab(pr) {
                Ok(pr) => result.valid.push(pr),
                Err(bad) => {
                    warn!(pr_number = bad.number, reason = %bad.reason, "skipping malformed PR");
                    result.malformed.push(bad);
                }
            }
        }
        debug!(
            count = result.valid.len(),
            malformed = result.malformed.len(),
            "listed open PRs"
        );
        Ok(result)
    }

    async fn list_reviews(&self, pr_number: u64) -> Result<Vec<Review>> {
        debug!(pr_number, "listing reviews");
        let page = self
            .client
            .pulls(&self.repo.owner, &self.repo.repo)
            .list_reviews(pr_number)
            .per_page(PER_PAGE)
            .send()
            .await?;
        let reviews = self.client.all_pages(page).await?;

        let result: Vec<Review> = reviews
            .into_iter()
            .filter_map(|r| {
                // Reviews by deleted accounts have no user; they cannot be attributed
                let reviewer = r.user?.login;
                let state = r.state.as_ref().map_or(ReviewState::Pending, review_state_from_octocrab);
                Some(Review {
                    reviewer,
                    state,
                    submitted_at: r.submitted_at,
                })
            })
            .collect();
        debug!(pr_number, count = result.len(), "listed reviews");
        Ok(result)
    }

    async fn list_requested_reviewers(&self, pr_number: u64) -> Result<Vec<String>> {
        let response: RequestedReviewersResponse = self
            .get_json(&format!("pulls/{pr_number}/requested_reviewers"))
            .await?;
        Ok(response.users.into_iter().map(|u| u.login).collect())
    }

    async fn list_check_runs(&self, sha: &str) -> Result<Vec<CheckRun>> {
        let mut runs = Vec::new();
        let mut page = 1u32;
        loop {
            let response: CheckRunsResponse = self
                .get_json(&format!(
                    "commits/{sha}/check-runs?per_page={PER_PAGE}&page={page}"
                ))
                .await?;
            let len = response.check_runs.len();
            runs.extend(response.check_runs.into_iter().map(|c| CheckRun {
                name: c.name,
                conclusion: c.conclusion,
            }));
            let complete = response.total_count.is_some_and(|t| runs.len() >= t);
            if len < usize::from(PER_PAGE) || complete {
                break;
            }
            page += 1;
        }
        debug!(sha, count = runs.len(), "listed check runs");
        Ok(runs)
    }

    async fn list_commit_statuses(&self, sha: &str) -> Result<Vec<CommitStatus>> {
        let mut statuses = Vec::new();
        let mut page = 1u32;
        loop {
            let response: CombinedStatus = self
                .get_json(&format!(
                    "commits/{sha}/status?per_page={PER_PAGE}&page={page}"
                ))
                .await?;
            let len = response.statuses.len();
            statuses.extend(response.statuses.into_iter().map(|s| CommitStatus {
                context: s.context,
                state: s.state,
            }));
            let complete = response.total_count.is_some_and(|t| statuses.len() >= t);
            if len < usize::from(PER_PAGE) || complete {
                break;
            }
            page += 1;
        }
        debug!(sha, count = statuses.len(), "listed commit statuses");
        Ok(statuses)
    }

    async fn list_collaborators(&self) -> Result<Vec<String>> {
        let mut logins = Vec::new();
        let mut page = 1u32;
        loop {
            let batch: Vec<Login> = self
                .get_json(&format!("collaborators?per_page={PER_PAGE}&page={page}"))
                .await?;
            let len = batch.len();
            logins.extend(batch.into_iter().map(|l| l.login));
            if len < usize::from(PER_PAGE) {
                break;
            }
            page += 1;
        }
        debug!(count = logins.len(), "listed collaborators");
        Ok(logins)
    }

    async fn list_pr_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        debug!(pr_number, "listing PR comments");
        let page = self
            .client
            .issues(&self.repo.owner, &self.repo.repo)
            .list_comments(pr_number)
            .per_page(PER_PAGE)
            .send()
            .await?;
        let comments = self.client.all_pages(page).await?;

        let result: Vec<PrComment> = comments
            .into_iter()
            .map(|c| PrComment {
                id: c.id.0,
                author: c.user.login,
                body: c.body.unwrap_or_default(),
                created_at: c.created_at,
            })
            .collect();
        debug!(pr_number, count = result.len(), "listed PR comments");
        Ok(result)
    }

    async fn create_pr_comment(&self, pr_number: u64, body: &str) -> Result<u64> {
        debug!(pr_number, "creating PR comment");
        let comment = self
            .client
            .issues(&self.repo.owner, &self.repo.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, comment_id = comment.id.0, "created PR comment");
        Ok(comment.id.0)
    }

    async fn delete_comment(&self, comment_id: u64) -> Result<()> {
        debug!(comment_id, "deleting comment");
        self.client
            .issues(&self.repo.owner, &self.repo.repo)
            .delete_comment(octocrab::models::CommentId(comment_id))
            .await?;
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, sha: &str) -> Result<MergeResult> {
        debug!(pr_number, sha, "merging PR");
        let result = self
            .client
            .pulls(&self.repo.owner, &self.repo.repo)
            .merge(pr_number)
            .sha(sha)
            .send()
            .await?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };
        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    fn repo(&self) -> &RepoConfig {
        &self.repo
    }
}
