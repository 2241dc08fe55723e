//! Collaborator trust
//!
//! The collaborator set is fetched once per run and is read-only afterwards.

use crate::error::Result;
use crate::platform::PlatformService;
use std::collections::HashSet;
use tracing::info;

/// Set of trusted collaborator logins
#[derive(Debug, Clone, Default)]
pub struct Collaborators {
    logins: HashSet<String>,
}

impl Collaborators {
    /// Build from a list of logins
    pub fn new<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            logins: logins
                .into_iter()
                .map(|l| l.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Fetch the repository's collaborators
    pub async fn fetch(platform: &dyn PlatformService) -> Result<Self> {
        let logins = platform.list_collaborators().await?;
        info!(count = logins.len(), "loaded collaborators");
        Ok(Self::new(logins))
    }

    /// Whether `login` is a collaborator (case-insensitive)
    pub fn is_trusted(&self, login: &str) -> bool {
        self.logins.contains(&login.to_lowercase())
    }

    /// Number of collaborators
    pub fn len(&self) -> usize {
        self.logins.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.logins.is_empty()
    }
}
