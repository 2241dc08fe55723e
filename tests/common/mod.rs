//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{CreateCommentCall, MergeCall, MockPlatformService};

use chrono::{DateTime, Duration, TimeZone, Utc};
use review_gate::gate::default_gates;
use review_gate::run::RunOptions;
use review_gate::signals::RetryPolicy;
use review_gate::types::{CheckRun, CommitStatus, PrComment, PullRequest, RepoConfig, Review, ReviewState};

pub const BOT: &str = "gate-bot";

pub fn repo_config() -> RepoConfig {
    RepoConfig {
        owner: "BlueWallet".to_string(),
        repo: "BlueWallet".to_string(),
    }
}

/// Fixed clock for comment ages
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap()
}

/// Same-repository PR by `dave` with head SHA `sha-<number>`
pub fn make_pr(number: u64, title: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        author: "dave".to_string(),
        head_repo: Some("BlueWallet/BlueWallet".to_string()),
        head_sha: format!("sha-{number}"),
        labels: vec![],
        requested_reviewers: vec![],
    }
}

pub fn review(reviewer: &str, state: ReviewState, minute: u32) -> Review {
    Review {
        reviewer: reviewer.to_string(),
        state,
        submitted_at: Some(Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0).unwrap()),
    }
}

pub fn check_run(name: &str, conclusion: &str) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        conclusion: Some(conclusion.to_string()),
    }
}

pub fn status(context: &str, state: &str) -> CommitStatus {
    CommitStatus {
        context: context.to_string(),
        state: state.to_string(),
    }
}

pub fn bot_comment(id: u64, body: &str, hours_ago: i64) -> PrComment {
    PrComment {
        id,
        author: BOT.to_string(),
        body: body.to_string(),
        created_at: now() - Duration::hours(hours_ago),
    }
}

/// Mock with collaborators alice, bob, and dave
pub fn mock() -> MockPlatformService {
    let mock = MockPlatformService::with_repo(repo_config());
    mock.set_collaborators(&["alice", "bob", "dave"]);
    mock
}

/// Register a PR that passes every gate
pub fn setup_green_pr(mock: &MockPlatformService, pr: PullRequest) {
    let number = pr.number;
    let sha = pr.head_sha.clone();
    mock.add_pr(pr);
    mock.set_reviews(number, vec![review("alice", ReviewState::Approved, 1)]);
    mock.set_check_runs(&sha, vec![check_run("test", "success")]);
}

pub fn options() -> RunOptions {
    RunOptions {
        gates: default_gates(),
        bot_login: Some(BOT.to_string()),
        web_base: "https://github.com".to_string(),
        reminder_expiry: Duration::hours(24),
        retry: RetryPolicy {
            attempts: 1,
            timeout: std::time::Duration::from_secs(5),
            backoff: std::time::Duration::from_millis(1),
        },
        dry_run: false,
        cleanup: true,
    }
}
