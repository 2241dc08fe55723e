//! Outbound notifications
//!
//! Fire-and-forget: delivery failures are logged and never reach the caller.

use crate::config::NotifierConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Form field carrying the message text
pub const MESSAGE_FIELD: &str = "message";

/// Sink for merge announcements
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message`, logging any failure
    async fn notify(&self, message: &str);
}

/// Notifier posting a form-encoded message to `<base_url>/<connector>`
pub struct HttpNotifier {
    client: Client,
    endpoint: String,
}

impl HttpNotifier {
    /// Create a notifier for the configured endpoint
    pub fn new(config: &NotifierConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("review-gate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Notify(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/{}",
                config.base_url.trim_end_matches('/'),
                urlencoding::encode(&config.connector)
            ),
        })
    }

    /// Send `message`, returning any delivery failure
    pub async fn send(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[(MESSAGE_FIELD, message)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(Error::Notify(format!("endpoint returned {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, message: &str) {
        match self.send(message).await {
            Ok(body) => debug!(response = %body, "notification delivered"),
            Err(e) => warn!(error = %e, "notification failed"),
        }
    }
}
