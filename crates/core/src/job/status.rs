//! Job status state machine.
//!
//! Statuses follow the pipeline stages in order:
//!
//! ```text
//! Pending -> ScenePlanning -> AssetRetrieval -> AudioProcessing -> Rendering -> Completed
//!                                  |
//!                                  +-> TtsGeneration -> AudioProcessing
//!
//! Any non-terminal status can transition to Failed or Cancelled.
//! ```
//!
//! `Completed`, `Failed` and `Cancelled` are absorbing: once a job reaches
//! one of them, every further transition is rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for illegal state machine transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusError {
    /// The requested transition is not an edge of the state machine.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
}

/// Execution status of a video generation job.
///
/// The snake_case serde spellings are part of the wire contract consumed by
/// the transport layer; do not rename them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job accepted, waiting for the orchestrator to pick it up.
    Pending,
    /// Scene planner is breaking the prompt into a storyboard.
    ScenePlanning,
    /// Stock footage is being resolved for each scene.
    AssetRetrieval,
    /// Speech synthesis is producing raw narration audio.
    TtsGeneration,
    /// Narration audio and subtitles are being merged into the storyboard.
    AudioProcessing,
    /// The renderer is composing the final video.
    Rendering,
    /// Terminal: the video was produced successfully.
    Completed,
    /// Terminal: a stage failed; the error is recorded on the job progress.
    Failed,
    /// Terminal: the job was cancelled cooperatively.
    Cancelled,
}

impl JobStatus {
    /// Returns the wire-format string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::ScenePlanning => "scene_planning",
            JobStatus::AssetRetrieval => "asset_retrieval",
            JobStatus::TtsGeneration => "tts_generation",
            JobStatus::AudioProcessing => "audio_processing",
            JobStatus::Rendering => "rendering",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Returns true if the job is in an active processing stage.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            JobStatus::ScenePlanning
                | JobStatus::AssetRetrieval
                | JobStatus::TtsGeneration
                | JobStatus::AudioProcessing
                | JobStatus::Rendering
        )
    }

    /// Returns true if `to` is a legal transition from this status.
    pub fn can_transition_to(&self, to: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        // Failure and cancellation are reachable from any non-terminal status.
        if matches!(to, JobStatus::Failed | JobStatus::Cancelled) {
            return true;
        }
        matches!(
            (self, to),
            (JobStatus::Pending, JobStatus::ScenePlanning)
                | (JobStatus::ScenePlanning, JobStatus::AssetRetrieval)
                | (JobStatus::AssetRetrieval, JobStatus::TtsGeneration)
                | (JobStatus::AssetRetrieval, JobStatus::AudioProcessing)
                | (JobStatus::TtsGeneration, JobStatus::AudioProcessing)
                | (JobStatus::AudioProcessing, JobStatus::Rendering)
                | (JobStatus::Rendering, JobStatus::Completed)
        )
    }

    /// Validates the transition to `to`, returning the new status.
    pub fn transition(&self, to: JobStatus) -> Result<JobStatus, StatusError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(StatusError::InvalidTransition { from: *self, to })
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
