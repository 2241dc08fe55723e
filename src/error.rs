//! Error types for review-gate

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by platform calls, collection, and actions
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API returned an error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform failure (used by non-GitHub implementations and mocks)
    #[error("platform error: {0}")]
    Platform(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response was missing a required field or could not be interpreted
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A platform call did not complete in time
    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        /// Name of the call that timed out
        operation: String,
        /// The bound that was exceeded
        after: Duration,
    },

    /// Startup configuration is missing or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Outbound notification could not be delivered
    #[error("notifier error: {0}")]
    Notify(String),
}

impl Error {
    /// Whether a retry has a reasonable chance of succeeding
    ///
    /// Transport failures, timeouts, rate limiting, and server errors are
    /// transient. Everything else is returned to the caller unchanged.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status()
                        .is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
            }
            Self::GitHubApi(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("rate limit")
                    || lower.contains("timed out")
                    || lower.contains("502")
                    || lower.contains("503")
            }
            _ => false,
        }
    }
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(source.message),
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

/// Startup configuration problems
///
/// These are fatal: the binary reports them and exits non-zero before any
/// pull request is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required value was absent or blank
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    /// A value was present but could not be used
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Configuration key
        key: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// The configuration file could not be read or parsed
    #[error("config file {path}: {reason}")]
    File {
        /// Path that was read
        path: String,
        /// Underlying failure
        reason: String,
    },
}
