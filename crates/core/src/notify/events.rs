//! Job event types published to external observers.

use serde::{Deserialize, Serialize};

use crate::job::JobStatus;

/// An event published by the orchestrator.
///
/// The serde representation is the wire format the transport layer
/// broadcasts to WebSocket clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    /// A job changed status or committed a progress milestone.
    StatusChanged {
        job_id: String,
        status: JobStatus,
        progress_pct: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// A textual log line for a job.
    Log {
        job_id: String,
        level: String,
        message: String,
    },

    /// A job finished successfully.
    Completed {
        job_id: String,
        video_url: String,
        duration: f64,
    },

    /// A job failed.
    Failed { job_id: String, error: String },
}

impl JobEvent {
    /// The job this event belongs to.
    pub fn job_id(&self) -> &str {
        match self {
            JobEvent::StatusChanged { job_id, .. }
            | JobEvent::Log { job_id, .. }
            | JobEvent::Completed { job_id, .. }
            | JobEvent::Failed { job_id, .. } => job_id,
        }
    }
}
