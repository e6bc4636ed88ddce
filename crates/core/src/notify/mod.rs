//! Event publication.
//!
//! The orchestrator reports progress through the fire-and-forget
//! [`EventNotifier`] contract; the transport layer (WebSocket broadcaster)
//! sits on the other side of a [`ChannelNotifier`]. Completion webhooks are
//! a separate best-effort channel bounded by a configurable timeout.

mod events;
mod handle;
mod webhook;

pub use events::JobEvent;
pub use handle::{ChannelNotifier, EventEnvelope, NullNotifier};
pub use webhook::{WebhookClient, WebhookConfig};

use async_trait::async_trait;

use crate::job::JobStatus;

/// Fire-and-forget event publication.
///
/// Implementations must never fail or block orchestration: publish errors
/// are logged and swallowed.
#[async_trait]
pub trait EventNotifier: Send + Sync {
    /// Publish a status/progress update.
    async fn publish_status(
        &self,
        job_id: &str,
        status: JobStatus,
        progress_pct: f32,
        message: Option<&str>,
    );

    /// Publish a log line.
    async fn publish_log(&self, job_id: &str, level: &str, message: &str);

    /// Publish job completion.
    async fn publish_completed(&self, job_id: &str, video_url: &str, duration: f64);

    /// Publish job failure.
    async fn publish_failed(&self, job_id: &str, error: &str);
}
