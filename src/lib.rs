//! review-gate: merge gate and reviewer reminders for GitHub pull requests
//!
//! Each invocation is a stateless pass over the repository's open pull
//! requests. Signals are collected from the platform, reduced to a verdict by
//! a pure evaluator, and acted upon: ready PRs are merged and commented on,
//! requested reviewers are reminded, and the bot's own stale comments are
//! pruned.

pub mod actions;
pub mod comments;
pub mod config;
pub mod error;
pub mod gate;
pub mod notify;
pub mod platform;
pub mod run;
pub mod signals;
pub mod trust;
pub mod types;

pub use error::{ConfigError, Error, Result};
