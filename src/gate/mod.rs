//! Merge-readiness evaluation
//!
//! Three-phase pattern:
//! 1. Collect - fetch signals (effectful, see `signals`)
//! 2. Evaluate - reduce signals to a `Verdict` (pure, testable)
//! 3. Act - merge, comment, notify (effectful, see `actions`)

mod approval;
mod ci;
mod verdict;

pub use approval::{is_approved, latest_decisions};
pub use ci::{CiGate, Matcher, default_gates, missing_gates};
pub use verdict::{BLOCKER_PREFIXES, Verdict, evaluate, is_blocker_label};
