//! Review approval
//!
//! Reviews are folded in chronological order into a map from reviewer to
//! latest decision, so the last qualifying review per reviewer wins.

use crate::trust::Collaborators;
use crate::types::{Review, ReviewState};
use std::collections::BTreeMap;

/// Latest decision of each qualifying reviewer
///
/// Keys are lowercased logins. A review qualifies when it is not authored by
/// the PR author, comes from a trusted collaborator, and carries a decision
/// (pure comments are skipped).
pub fn latest_decisions(
    reviews: &[Review],
    author: &str,
    collaborators: &Collaborators,
) -> BTreeMap<String, ReviewState> {
    let author = author.to_lowercase();

    let mut ordered: Vec<&Review> = reviews.iter().collect();
    // Stable: reviews without a timestamp keep the platform's order ahead of dated ones
    ordered.sort_by_key(|r| r.submitted_at);

    ordered
        .into_iter()
        .filter(|r| r.state != ReviewState::Commented)
        .filter(|r| r.reviewer.to_lowercase() != author)
        .filter(|r| collaborators.is_trusted(&r.reviewer))
        .fold(BTreeMap::new(), |mut latest, r| {
            latest.insert(r.reviewer.to_lowercase(), r.state);
            latest
        })
}

/// Whether the qualifying reviews amount to approval
///
/// True only when at least one reviewer qualifies and every qualifying
/// reviewer's latest decision is an approval.
pub fn is_approved(decisions: &BTreeMap<String, ReviewState>) -> bool {
    !decisions.is_empty() && decisions.values().all(|s| *s == ReviewState::Approved)
}
