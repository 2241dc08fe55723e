//! One pass over all open pull requests
//!
//! PRs are processed strictly one after another. A failure is confined to the
//! narrowest unit of work: a collection failure ends processing of that PR, a
//! cleanup or action failure is recorded and the PR's remaining steps still
//! run. Only failures before the loop (listing PRs, loading collaborators)
//! abort the pass.

use crate::actions::{MergeOutcome, ReminderReport, execute_merge, post_reminders};
use crate::comments::{
    CleanupPolicy, CleanupReport, plan_cleanup, prune_comments, reminded_reviewers,
};
use crate::error::{Error, Result};
use crate::gate::{CiGate, Verdict, evaluate};
use crate::notify::Notifier;
use crate::platform::PlatformService;
use crate::signals::{RetryPolicy, collect_requested_reviewers, collect_signals, with_retry};
use crate::trust::Collaborators;
use crate::types::{MalformedPr, OpenPrs, PrComment, PullRequest};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{info, warn};

/// Processing stage of a single PR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Fetching reviews, checks, statuses, and requests
    Collection,
    /// Listing or deleting the bot's comments
    Cleanup,
    /// Merging, commenting, or reminding
    Action,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => write!(f, "collection"),
            Self::Cleanup => write!(f, "cleanup"),
            Self::Action => write!(f, "action"),
        }
    }
}

/// A failure attributed to one stage of one PR
#[derive(Debug)]
pub struct StageFailure {
    /// Stage that failed
    pub stage: Stage,
    /// Underlying error
    pub error: Error,
}

impl std::fmt::Display for StageFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

/// What happened to one PR during the pass
#[derive(Debug)]
pub struct PrReport {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Verdict, when signals were collected (merge mode)
    pub verdict: Option<Verdict>,
    /// Merge outcome, when the PR was ready (merge mode)
    pub merge: Option<MergeOutcome>,
    /// Comment cleanup result, when cleanup ran
    pub cleanup: Option<CleanupReport>,
    /// Reminder result (remind mode)
    pub reminders: Option<ReminderReport>,
    /// Failures, in the order they occurred
    pub failures: Vec<StageFailure>,
}

impl PrReport {
    fn new(pr: &PullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title.clone(),
            verdict: None,
            merge: None,
            cleanup: None,
            reminders: None,
            failures: Vec::new(),
        }
    }

    fn malformed(entry: &MalformedPr) -> Self {
        let mut report = Self {
            number: entry.number,
            title: String::new(),
            verdict: None,
            merge: None,
            cleanup: None,
            reminders: None,
            failures: Vec::new(),
        };
        report.fail(
            Stage::Collection,
            Error::MalformedResponse(format!("PR #{}: {}", entry.number, entry.reason)),
        );
        report
    }

    /// Record the cleanup result, turning each failed deletion into a failure
    fn record_cleanup(&mut self, cleanup: CleanupReport) {
        for comment_id in &cleanup.failed {
            self.fail(
                Stage::Cleanup,
                Error::Platform(format!("comment {comment_id} was not deleted")),
            );
        }
        self.cleanup = Some(cleanup);
    }

    fn fail(&mut self, stage: Stage, error: Error) {
        warn!(pr_number = self.number, %stage, error = %error, "stage failed");
        self.failures.push(StageFailure { stage, error });
    }

    /// First failure in `stage`, if any
    pub fn failure_in(&self, stage: Stage) -> Option<&StageFailure> {
        self.failures.iter().find(|f| f.stage == stage)
    }
}

/// Reports for every PR in the pass
#[derive(Debug, Default)]
pub struct RunSummary {
    /// One report per open PR, in listing order
    pub prs: Vec<PrReport>,
}

impl RunSummary {
    /// PRs whose verdict was ready
    pub fn ready_count(&self) -> usize {
        self.prs
            .iter()
            .filter(|p| p.verdict.as_ref().is_some_and(|v| v.ready))
            .count()
    }

    /// PRs actually merged
    pub fn merged_count(&self) -> usize {
        self.prs
            .iter()
            .filter(|p| p.merge.as_ref().is_some_and(MergeOutcome::is_merged))
            .count()
    }

    /// PRs with at least one failure
    pub fn failed_count(&self) -> usize {
        self.prs.iter().filter(|p| !p.failures.is_empty()).count()
    }

    /// Reminders posted across all PRs
    pub fn reminders_posted(&self) -> usize {
        self.prs
            .iter()
            .filter_map(|p| p.reminders.as_ref())
            .map(|r| r.posted.len())
            .sum()
    }

    /// Comments deleted across all PRs
    pub fn comments_deleted(&self) -> usize {
        self.prs
            .iter()
            .filter_map(|p| p.cleanup.as_ref())
            .map(|c| c.deleted.len())
            .sum()
    }
}

/// Settings shared by every PR in a pass
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Required CI categories
    pub gates: Vec<CiGate>,
    /// Bot login; None disables comment cleanup and reminder deduplication
    pub bot_login: Option<String>,
    /// Web host for review queue links
    pub web_base: String,
    /// Age after which reminders are deleted
    pub reminder_expiry: chrono::Duration,
    /// Timeout and retry settings for collection calls
    pub retry: RetryPolicy,
    /// Log intended mutations instead of performing them
    pub dry_run: bool,
    /// Whether to prune stale bot comments
    pub cleanup: bool,
}

impl RunOptions {
    fn cleanup_login(&self) -> Option<&str> {
        self.bot_login.as_deref().filter(|_| self.cleanup)
    }
}

/// Pass context: platform, notifier, settings, and the run's clock
pub struct Runner<'a> {
    platform: &'a dyn PlatformService,
    notifier: Option<&'a dyn Notifier>,
    options: RunOptions,
    now: DateTime<Utc>,
}

impl<'a> Runner<'a> {
    /// Create a runner; `now` is captured once for the whole pass
    pub fn new(
        platform: &'a dyn PlatformService,
        notifier: Option<&'a dyn Notifier>,
        options: RunOptions,
    ) -> Self {
        Self {
            platform,
            notifier,
            options,
            now: Utc::now(),
        }
    }

    /// Use a fixed clock (for tests)
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    async fn open_prs(&self) -> Result<OpenPrs> {
        let prs = with_retry("list open PRs", &self.options.retry, || {
            self.platform.list_open_prs()
        })
        .await?;
        info!(repo = %self.platform.repo(), count = prs.len(), "open pull requests");
        Ok(prs)
    }

    async fn collaborators(&self) -> Result<Collaborators> {
        with_retry("list collaborators", &self.options.retry, || {
            Collaborators::fetch(self.platform)
        })
        .await
    }

    async fn list_comments(&self, pr_number: u64) -> Result<Vec<PrComment>> {
        with_retry("list comments", &self.options.retry, || {
            self.platform.list_pr_comments(pr_number)
        })
        .await
    }

    /// Merge mode: prune old success notices, evaluate, merge ready PRs
    pub async fn merge_pass(&self) -> Result<RunSummary> {
        let prs = self.open_prs().await?;
        let collaborators = self.collaborators().await?;

        let mut summary = RunSummary::default();
        for pr in &prs.valid {
            summary.prs.push(self.merge_one(pr, &collaborators).await);
        }
        summary.prs.extend(prs.malformed.iter().map(PrReport::malformed));
        Ok(summary)
    }

    async fn merge_one(&self, pr: &PullRequest, collaborators: &Collaborators) -> PrReport {
        info!(pr_number = pr.number, title = %pr.title, "evaluating");
        let mut report = PrReport::new(pr);

        let signals = match collect_signals(self.platform, pr, &self.options.retry).await {
            Ok(signals) => signals,
            Err(e) => {
                report.fail(Stage::Collection, e);
                return report;
            }
        };

        if let Some(bot) = self.options.cleanup_login() {
            match self.list_comments(pr.number).await {
                Ok(comments) => {
                    let cleanup = prune_comments(
                        self.platform,
                        pr.number,
                        &comments,
                        bot,
                        &CleanupPolicy::success_notices(),
                        self.now,
                        self.options.dry_run,
                    )
                    .await;
                    report.record_cleanup(cleanup);
                }
                Err(e) => report.fail(Stage::Cleanup, e),
            }
        }

        let verdict = evaluate(&signals, collaborators, &self.options.gates);
        info!(
            pr_number = pr.number,
            ready = verdict.ready,
            approved = verdict.approved,
            pending_review_request = verdict.pending_review_request,
            ci_passed = verdict.ci_passed,
            outside_contributor = verdict.outside_contributor,
            blocker_label_present = verdict.blocker_label_present,
            "verdict"
        );

        if verdict.ready {
            if let Some(notifier) = self.notifier
                && !self.options.dry_run
            {
                notifier
                    .notify(&format!(
                        "Merging {} #{}: {}",
                        self.platform.repo(),
                        pr.number,
                        pr.title
                    ))
                    .await;
            }

            let attempt = execute_merge(self.platform, pr, self.options.dry_run).await;
            report.merge = Some(attempt.outcome);
            if let Some(e) = attempt.comment_error {
                report.fail(Stage::Action, e);
            }
        }

        report.verdict = Some(verdict);
        report
    }

    /// Reminder mode: expire old reminders, remind requested reviewers
    pub async fn remind_pass(&self) -> Result<RunSummary> {
        let prs = self.open_prs().await?;

        let mut summary = RunSummary::default();
        for pr in &prs.valid {
            summary.prs.push(self.remind_one(pr).await);
        }
        summary.prs.extend(prs.malformed.iter().map(PrReport::malformed));
        Ok(summary)
    }

    async fn remind_one(&self, pr: &PullRequest) -> PrReport {
        let mut report = PrReport::new(pr);

        let reviewers =
            match collect_requested_reviewers(self.platform, pr, &self.options.retry).await {
                Ok(reviewers) => reviewers,
                Err(e) => {
                    report.fail(Stage::Collection, e);
                    return report;
                }
            };
        info!(pr_number = pr.number, ?reviewers, "requested reviewers");

        let mut already_reminded = HashSet::new();
        if let Some(bot) = self.options.cleanup_login() {
            match self.list_comments(pr.number).await {
                Ok(comments) => {
                    let policy = CleanupPolicy::reminders(self.options.reminder_expiry);
                    let expiring = plan_cleanup(&comments, bot, &policy, self.now);
                    already_reminded = reminded_reviewers(&comments, bot, &expiring);
                    let cleanup = prune_comments(
                        self.platform,
                        pr.number,
                        &comments,
                        bot,
                        &policy,
                        self.now,
                        self.options.dry_run,
                    )
                    .await;
                    report.record_cleanup(cleanup);
                }
                Err(e) => report.fail(Stage::Cleanup, e),
            }
        }

        if !reviewers.is_empty() {
            let reminders = post_reminders(
                self.platform,
                &self.options.web_base,
                pr.number,
                &reviewers,
                &already_reminded,
                self.options.dry_run,
            )
            .await;
            for reviewer in &reminders.failed {
                report.fail(
                    Stage::Action,
                    Error::Platform(format!("reminder for {reviewer} was not posted")),
                );
            }
            report.reminders = Some(reminders);
        }

        report
    }

    /// Evaluate a single open PR without side effects
    pub async fn check(&self, pr_number: u64) -> Result<Verdict> {
        let prs = self.open_prs().await?;
        if let Some(bad) = prs.malformed.iter().find(|p| p.number == pr_number) {
            return Err(Error::MalformedResponse(format!(
                "PR #{pr_number}: {}",
                bad.reason
            )));
        }
        let pr = prs
            .valid
            .iter()
            .find(|p| p.number == pr_number)
            .ok_or_else(|| Error::Platform(format!("PR #{pr_number} is not open")))?;
        let collaborators = self.collaborators().await?;
        let signals = collect_signals(self.platform, pr, &self.options.retry).await?;
        Ok(evaluate(&signals, &collaborators, &self.options.gates))
    }
}
