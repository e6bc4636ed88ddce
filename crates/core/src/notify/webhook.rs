//! Best-effort completion webhooks.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::job::VideoResult;

/// Webhook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Master switch; when false no webhook is ever sent.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Posts job results to caller-supplied callback URLs.
///
/// Strictly best-effort: every failure is logged and swallowed, a webhook
/// can never change a job's outcome.
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    timeout: Duration,
    enabled: bool,
}

impl WebhookClient {
    /// Create a client from configuration.
    pub fn new(config: &WebhookConfig) -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(config.timeout_secs),
            enabled: config.enabled,
        }
    }

    /// A client that never sends anything.
    pub fn disabled() -> Self {
        Self::new(&WebhookConfig {
            enabled: false,
            timeout_secs: default_timeout(),
        })
    }

    /// Whether webhooks are enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// POST the result to `url` as JSON.
    pub async fn notify(&self, url: &str, result: &VideoResult) {
        if !self.enabled {
            return;
        }

        let send = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(result)
            .send()
            .await;

        match send {
            Ok(response) if response.status().is_success() => {
                crate::metrics::EXTERNAL_REQUESTS
                    .with_label_values(&["webhook", "success"])
                    .inc();
                info!(job_id = %result.job_id, url = %url, "webhook delivered");
            }
            Ok(response) => {
                crate::metrics::EXTERNAL_REQUESTS
                    .with_label_values(&["webhook", "error"])
                    .inc();
                warn!(
                    job_id = %result.job_id,
                    url = %url,
                    status = %response.status(),
                    "webhook rejected"
                );
            }
            Err(e) => {
                crate::metrics::EXTERNAL_REQUESTS
                    .with_label_values(&["webhook", "error"])
                    .inc();
                warn!(job_id = %result.job_id, url = %url, "webhook failed: {}", e);
            }
        }
    }
}
