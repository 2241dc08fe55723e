//! CI categories
//!
//! A category is satisfied when any check run or commit status whose name
//! matches one of its matchers reports success. Both channels are consulted;
//! either one is enough for a given category.

use crate::types::{CheckRun, CommitStatus};

/// How a check name or status context is matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Name must equal this string
    Exact(String),
    /// Name must start with this string
    Prefix(String),
}

impl Matcher {
    /// Whether `name` satisfies this matcher
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(s) => name == s,
            Self::Prefix(p) => name.starts_with(p.as_str()),
        }
    }
}

/// A required CI category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiGate {
    /// Category name, used in blocking reasons
    pub name: String,
    /// Names that report on this category
    pub matchers: Vec<Matcher>,
}

impl CiGate {
    fn matches(&self, name: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(name))
    }

    /// Whether any success signal from either channel satisfies this gate
    pub fn is_satisfied(&self, check_runs: &[CheckRun], statuses: &[CommitStatus]) -> bool {
        let by_check = check_runs
            .iter()
            .any(|c| c.conclusion.as_deref() == Some("success") && self.matches(&c.name));
        let by_status = statuses
            .iter()
            .any(|s| s.state == "success" && self.matches(&s.context));
        by_check || by_status
    }
}

/// Default required categories
///
/// A combined `test` job implies unit, integration, and lint all passed.
/// Each category can also be reported on its own, and CircleCI statuses count
/// as unit tests.
pub fn default_gates() -> Vec<CiGate> {
    let gate = |name: &str, extra: Vec<Matcher>| {
        let mut matchers = vec![
            Matcher::Exact(name.to_string()),
            Matcher::Exact("test".to_string()),
        ];
        matchers.extend(extra);
        CiGate {
            name: name.to_string(),
            matchers,
        }
    };
    vec![
        gate("unit", vec![Matcher::Prefix("ci/circleci".to_string())]),
        gate("integration", Vec::new()),
        gate("lint", Vec::new()),
    ]
}

/// Names of gates with no success signal
///
/// Empty means CI passed.
pub fn missing_gates<'a>(
    gates: &'a [CiGate],
    check_runs: &[CheckRun],
    statuses: &[CommitStatus],
) -> Vec<&'a str> {
    gates
        .iter()
        .filter(|g| !g.is_satisfied(check_runs, statuses))
        .map(|g| g.name.as_str())
        .collect()
}
