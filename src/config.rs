//! Startup configuration
//!
//! Values come from the environment, optionally layered over a TOML file.
//! Validation happens once, before any pull request is touched; a missing
//! credential is a [`ConfigError`], never a per-PR failure.

use crate::actions::DEFAULT_WEB_BASE;
use crate::error::ConfigError;
use crate::gate::{CiGate, Matcher, default_gates};
use crate::types::RepoConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default bound for a single platform call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of attempts for a collection call
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Default age after which reminder comments are deleted
pub const DEFAULT_REMINDER_EXPIRY_HOURS: i64 = 24;

/// On-disk configuration file
///
/// Every section is optional; anything omitted falls back to the defaults or
/// to environment values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Canonical repository
    #[serde(default)]
    pub repository: Option<FileRepository>,
    /// CI categories that must pass
    #[serde(default)]
    pub ci: Option<FileCi>,
    /// Comment lifecycle settings
    #[serde(default)]
    pub comments: Option<FileComments>,
    /// HTTP resilience settings
    #[serde(default)]
    pub http: Option<FileHttp>,
}

/// `[repository]` section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRepository {
    /// Repository owner
    pub owner: Option<String>,
    /// Repository name
    pub repo: Option<String>,
    /// Login used by the bot when posting comments
    pub bot_login: Option<String>,
}

/// `[ci]` section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileCi {
    /// Required categories, replacing the defaults when present
    #[serde(default, rename = "gate")]
    pub gates: Vec<FileGate>,
}

/// One `[[ci.gate]]` entry
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileGate {
    /// Category name (e.g. `unit`)
    pub name: String,
    /// Check/status names that satisfy the category exactly
    #[serde(default)]
    pub exact: Vec<String>,
    /// Check/status name prefixes that satisfy the category
    #[serde(default)]
    pub prefix: Vec<String>,
}

/// `[comments]` section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileComments {
    /// Reminder comments older than this are deleted
    pub reminder_expiry_hours: Option<i64>,
}

/// `[http]` section
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileHttp {
    /// Per-call timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Attempts per collection call (1 disables retries)
    pub attempts: Option<u32>,
}

impl FileConfig {
    /// Load and parse a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Outbound notifier settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// Endpoint base URL; the connector ID is appended as a path segment
    pub base_url: String,
    /// Connector identifier
    pub connector: String,
}

/// Command-line values that take precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Repository owner
    pub owner: Option<String>,
    /// Repository name
    pub repo: Option<String>,
    /// Whether the notifier must be configured
    pub notify: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Access token for the platform API
    pub token: String,
    /// Canonical repository
    pub repo: RepoConfig,
    /// API base URL override
    pub api_base: Option<String>,
    /// Web host for links in comments
    pub web_base: String,
    /// Bot login whose comments may be pruned (None disables cleanup)
    pub bot_login: Option<String>,
    /// Notifier settings (None when notifications are disabled)
    pub notifier: Option<NotifierConfig>,
    /// Required CI categories
    pub ci_gates: Vec<CiGate>,
    /// Age after which reminder comments are deleted
    pub reminder_expiry: chrono::Duration,
    /// Per-call timeout
    pub timeout: Duration,
    /// Attempts per collection call
    pub attempts: u32,
}

impl Config {
    /// Build configuration from the process environment
    pub fn from_env(file: Option<FileConfig>, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), file, overrides)
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(
        lookup: F,
        file: Option<FileConfig>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let file = file.unwrap_or_default();
        let file_repo = file.repository.as_ref();

        let token = get("GITHUB_TOKEN")
            .or_else(|| get("TOKEN"))
            .ok_or(ConfigError::Missing("GITHUB_TOKEN"))?;

        let owner = overrides
            .owner
            .clone()
            .or_else(|| get("REVIEW_GATE_OWNER"))
            .or_else(|| file_repo.and_then(|r| r.owner.clone()))
            .ok_or(ConfigError::Missing("REVIEW_GATE_OWNER"))?;
        let repo = overrides
            .repo
            .clone()
            .or_else(|| get("REVIEW_GATE_REPO"))
            .or_else(|| file_repo.and_then(|r| r.repo.clone()))
            .ok_or(ConfigError::Missing("REVIEW_GATE_REPO"))?;

        let bot_login = get("REVIEW_GATE_BOT_LOGIN")
            .or_else(|| file_repo.and_then(|r| r.bot_login.clone()));

        let notifier = if overrides.notify {
            let base_url = get("NOTIFIER_URL").ok_or(ConfigError::Missing("NOTIFIER_URL"))?;
            url::Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
                key: "NOTIFIER_URL",
                reason: e.to_string(),
            })?;
            let connector =
                get("NOTIFIER_CONNECTOR").ok_or(ConfigError::Missing("NOTIFIER_CONNECTOR"))?;
            Some(NotifierConfig {
                base_url,
                connector,
            })
        } else {
            None
        };

        let api_base = get("GITHUB_API_URL");
        if let Some(ref base) = api_base {
            url::Url::parse(base).map_err(|e| ConfigError::Invalid {
                key: "GITHUB_API_URL",
                reason: e.to_string(),
            })?;
        }

        let web_base = get("GITHUB_SERVER_URL").unwrap_or_else(|| DEFAULT_WEB_BASE.to_string());

        let ci_gates = match file.ci {
            Some(ci) if !ci.gates.is_empty() => gates_from_file(ci.gates)?,
            _ => default_gates(),
        };

        let expiry_hours = file
            .comments
            .and_then(|c| c.reminder_expiry_hours)
            .unwrap_or(DEFAULT_REMINDER_EXPIRY_HOURS);
        if expiry_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "comments.reminder_expiry_hours",
                reason: "must be positive".to_string(),
            });
        }

        let http = file.http;
        let timeout = http
            .as_ref()
            .and_then(|h| h.timeout_secs)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs);
        let attempts = http
            .as_ref()
            .and_then(|h| h.attempts)
            .unwrap_or(DEFAULT_ATTEMPTS)
            .max(1);

        Ok(Self {
            token,
            repo: RepoConfig { owner, repo },
            api_base,
            web_base,
            bot_login,
            notifier,
            ci_gates,
            reminder_expiry: chrono::Duration::hours(expiry_hours),
            timeout,
            attempts,
        })
    }
}

fn gates_from_file(gates: Vec<FileGate>) -> Result<Vec<CiGate>, ConfigError> {
    gates
        .into_iter()
        .map(|g| {
            if g.exact.is_empty() && g.prefix.is_empty() {
                return Err(ConfigError::Invalid {
                    key: "ci.gate",
                    reason: format!("gate '{}' has no matchers", g.name),
                });
            }
            let matchers = g
                .exact
                .into_iter()
                .map(Matcher::Exact)
                .chain(g.prefix.into_iter().map(Matcher::Prefix))
                .collect();
            Ok(CiGate {
                name: g.name,
                matchers,
            })
        })
        .collect()
}
