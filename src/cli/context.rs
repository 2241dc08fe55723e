//! Shared command context for CLI commands
//!
//! Extracts the setup shared by merge, remind, and check.

use review_gate::config::{Config, FileConfig, Overrides};
use review_gate::error::Result;
use review_gate::notify::{HttpNotifier, Notifier};
use review_gate::platform::{GitHubService, PlatformService};
use review_gate::run::{RunOptions, Runner};
use review_gate::signals::RetryPolicy;
use std::path::Path;
use std::time::Duration;

/// Shared context for commands that talk to the platform
///
/// Construction is the startup validation step: configuration is read and
/// checked here, before any pull request is touched.
pub struct CommandContext {
    /// Validated configuration
    pub config: Config,
    /// Platform service
    pub platform: Box<dyn PlatformService>,
    /// Notifier, when enabled
    pub notifier: Option<HttpNotifier>,
}

impl CommandContext {
    /// Load configuration and build the platform service
    pub fn new(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let file = config_path.map(FileConfig::load).transpose()?;
        let config = Config::from_env(file, overrides)?;

        let platform = GitHubService::new(
            &config.token,
            config.repo.clone(),
            config.api_base.as_deref(),
            config.timeout,
        )?;

        let notifier = config
            .notifier
            .as_ref()
            .map(|n| HttpNotifier::new(n, config.timeout))
            .transpose()?;

        Ok(Self {
            config,
            platform: Box::new(platform),
            notifier,
        })
    }

    /// Per-pass options derived from configuration and command flags
    pub fn run_options(&self, dry_run: bool, cleanup: bool) -> RunOptions {
        RunOptions {
            gates: self.config.ci_gates.clone(),
            bot_login: self.config.bot_login.clone(),
            web_base: self.config.web_base.clone(),
            reminder_expiry: self.config.reminder_expiry,
            retry: RetryPolicy {
                attempts: self.config.attempts,
                timeout: self.config.timeout,
                backoff: Duration::from_millis(500),
            },
            dry_run,
            cleanup,
        }
    }

    /// Runner over this context's platform and notifier
    pub fn runner(&self, options: RunOptions) -> Runner<'_> {
        let notifier = self.notifier.as_ref().map(|n| n as &dyn Notifier);
        Runner::new(self.platform.as_ref(), notifier, options)
    }
}
