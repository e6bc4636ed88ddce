//! Event notifier that records everything for test assertions.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::job::JobStatus;
use crate::notify::{EventNotifier, JobEvent};

/// Notifier that captures every published event.
#[derive(Default)]
pub struct RecordingNotifier {
    events: RwLock<Vec<JobEvent>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in publication order.
    pub async fn events(&self) -> Vec<JobEvent> {
        self.events.read().await.clone()
    }

    /// The `(status, progress)` pairs of recorded status events.
    pub async fn status_updates(&self) -> Vec<(JobStatus, f32)> {
        self.events
            .read()
            .await
            .iter()
            .filter_map(|e| match e {
                JobEvent::StatusChanged {
                    status,
                    progress_pct,
                    ..
                } => Some((*status, *progress_pct)),
                _ => None,
            })
            .collect()
    }

    /// The error of the first recorded failure event, if any.
    pub async fn first_failure(&self) -> Option<String> {
        self.events.read().await.iter().find_map(|e| match e {
            JobEvent::Failed { error, .. } => Some(error.clone()),
            _ => None,
        })
    }

    /// Whether a completion event was recorded.
    pub async fn has_completed(&self) -> bool {
        self.events
            .read()
            .await
            .iter()
            .any(|e| matches!(e, JobEvent::Completed { .. }))
    }
}

#[async_trait]
impl EventNotifier for RecordingNotifier {
    async fn publish_status(
        &self,
        job_id: &str,
        status: JobStatus,
        progress_pct: f32,
        message: Option<&str>,
    ) {
        self.events.write().await.push(JobEvent::StatusChanged {
            job_id: job_id.to_string(),
            status,
            progress_pct,
            message: message.map(str::to_string),
        });
    }

    async fn publish_log(&self, job_id: &str, level: &str, message: &str) {
        self.events.write().await.push(JobEvent::Log {
            job_id: job_id.to_string(),
            level: level.to_string(),
            message: message.to_string(),
        });
    }

    async fn publish_completed(&self, job_id: &str, video_url: &str, duration: f64) {
        self.events.write().await.push(JobEvent::Completed {
            job_id: job_id.to_string(),
            video_url: video_url.to_string(),
            duration,
        });
    }

    async fn publish_failed(&self, job_id: &str, error: &str) {
        self.events.write().await.push(JobEvent::Failed {
            job_id: job_id.to_string(),
            error: error.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_and_helpers() {
        let notifier = RecordingNotifier::new();
        notifier
            .publish_status("j", JobStatus::ScenePlanning, 20.0, None)
            .await;
        notifier.publish_failed("j", "boom").await;

        assert_eq!(notifier.events().await.len(), 2);
        assert_eq!(
            notifier.status_updates().await,
            vec![(JobStatus::ScenePlanning, 20.0)]
        );
        assert_eq!(notifier.first_failure().await.as_deref(), Some("boom"));
        assert!(!notifier.has_completed().await);
    }
}
