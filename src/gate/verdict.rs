//! Merge-readiness verdict - pure reduction over collected signals
//!
//! No I/O happens here: the same bundle always produces the same verdict.

use super::approval::{is_approved, latest_decisions};
use super::ci::{CiGate, missing_gates};
use crate::signals::SignalBundle;
use crate::trust::Collaborators;

/// Label prefixes that block merging (compared upper-cased)
pub const BLOCKER_PREFIXES: [&str; 2] = ["DO NOT MERGE", "WIP"];

/// Merge-readiness verdict for one pull request
///
/// Carries every sub-flag so callers can report why a PR is blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Verdict {
    /// Whether the PR may be merged
    pub ready: bool,
    /// Qualifying reviews all approve, and no review is outstanding
    pub approved: bool,
    /// A requested review has not been answered
    pub pending_review_request: bool,
    /// Every required CI category has a success signal
    pub ci_passed: bool,
    /// The PR comes from outside the canonical repository
    pub outside_contributor: bool,
    /// A blocker label is applied
    pub blocker_label_present: bool,
    /// Required CI categories without a success signal
    pub missing_ci: Vec<String>,
    /// Human-readable reasons the PR is not ready, in a stable order
    pub blocking_reasons: Vec<String>,
}

/// Whether a label name marks the PR as not mergeable
pub fn is_blocker_label(name: &str) -> bool {
    let upper = name.to_uppercase();
    BLOCKER_PREFIXES.iter().any(|p| upper.starts_with(p))
}

/// Evaluate a signal bundle (PURE - no I/O, easily testable)
#[must_use]
pub fn evaluate(signals: &SignalBundle, collaborators: &Collaborators, gates: &[CiGate]) -> Verdict {
    let pr = &signals.pr;

    let blocker_label_present = pr.labels.iter().any(|l| is_blocker_label(l));
    let outside_contributor = signals.from_outside;
    let pending_review_request = !signals.requested_reviewers.is_empty();

    let decisions = latest_decisions(&signals.reviews, &pr.author, collaborators);
    let approved = is_approved(&decisions) && !pending_review_request;

    let missing_ci: Vec<String> = missing_gates(gates, &signals.check_runs, &signals.statuses)
        .into_iter()
        .map(String::from)
        .collect();
    let ci_passed = missing_ci.is_empty();

    let mut blocking_reasons = Vec::new();
    if blocker_label_present {
        blocking_reasons.push("blocker label present".to_string());
    }
    if outside_contributor {
        blocking_reasons.push("outside contributor".to_string());
    }
    if pending_review_request {
        blocking_reasons.push(format!(
            "review requested from {}",
            signals.requested_reviewers.join(", ")
        ));
    }
    if decisions.is_empty() {
        blocking_reasons.push("no qualifying reviews".to_string());
    } else if let Some((reviewer, state)) = decisions
        .iter()
        .find(|(_, s)| **s != crate::types::ReviewState::Approved)
    {
        blocking_reasons.push(format!("not approved ({reviewer}: {state})"));
    }
    for category in &missing_ci {
        blocking_reasons.push(format!("CI not passed: {category}"));
    }

    let ready = approved && ci_passed && !outside_contributor && !blocker_label_present;

    Verdict {
        ready,
        approved,
        pending_review_request,
        ci_passed,
        outside_contributor,
        blocker_label_present,
        missing_ci,
        blocking_reasons,
    }
}
