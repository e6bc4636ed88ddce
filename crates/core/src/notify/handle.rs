//! Event notifier implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::job::JobStatus;

use super::events::JobEvent;
use super::EventNotifier;

/// Envelope wrapping a job event with its emission timestamp.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub timestamp: DateTime<Utc>,
    pub event: JobEvent,
}

/// Notifier that forwards events through an async channel.
///
/// Cheaply cloneable; the receiving end is owned by the transport layer
/// (WebSocket broadcaster, log shipper). Publishing never fails: if the
/// channel is full or closed the event is dropped with an error log, the
/// orchestration is never blocked or aborted.
#[derive(Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<EventEnvelope>,
}

impl ChannelNotifier {
    /// Create a notifier from a channel sender.
    pub fn new(tx: mpsc::Sender<EventEnvelope>) -> Self {
        Self { tx }
    }

    /// Create a notifier together with its receiving end.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<EventEnvelope>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }

    async fn emit(&self, event: JobEvent) {
        let envelope = EventEnvelope {
            timestamp: Utc::now(),
            event,
        };
        if let Err(e) = self.tx.send(envelope).await {
            tracing::error!("failed to publish job event: {}", e);
        }
    }
}

#[async_trait]
impl EventNotifier for ChannelNotifier {
    async fn publish_status(
        &self,
        job_id: &str,
        status: JobStatus,
        progress_pct: f32,
        message: Option<&str>,
    ) {
        self.emit(JobEvent::StatusChanged {
            job_id: job_id.to_string(),
            status,
            progress_pct,
            message: message.map(str::to_string),
        })
        .await;
    }

    async fn publish_log(&self, job_id: &str, level: &str, message: &str) {
        self.emit(JobEvent::Log {
            job_id: job_id.to_string(),
            level: level.to_string(),
            message: message.to_string(),
        })
        .await;
    }

    async fn publish_completed(&self, job_id: &str, video_url: &str, duration: f64) {
        self.emit(JobEvent::Completed {
            job_id: job_id.to_string(),
            video_url: video_url.to_string(),
            duration,
        })
        .await;
    }

    async fn publish_failed(&self, job_id: &str, error: &str) {
        self.emit(JobEvent::Failed {
            job_id: job_id.to_string(),
            error: error.to_string(),
        })
        .await;
    }
}

/// Notifier that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl EventNotifier for NullNotifier {
    async fn publish_status(
        &self,
        _job_id: &str,
        _status: JobStatus,
        _progress_pct: f32,
        _message: Option<&str>,
    ) {
    }

    async fn publish_log(&self, _job_id: &str, _level: &str, _message: &str) {}

    async fn publish_completed(&self, _job_id: &str, _video_url: &str, _duration: f64) {}

    async fn publish_failed(&self, _job_id: &str, _error: &str) {}
}
