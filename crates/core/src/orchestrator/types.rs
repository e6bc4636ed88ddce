//! Types for the pipeline orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::AssetError;
use crate::job::{RegistryError, StatusError, VideoResult};
use crate::render::RenderError;
use crate::speech::SpeechError;

/// Errors that can occur during orchestration.
///
/// Collaborator and artifact errors are fatal to the job they occur in,
/// never to the orchestrator itself: the owning task records them on the
/// job's progress and reports them through the failure channel.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// An expected cache artifact was absent: a stage-ordering or eviction
    /// bug, fatal to the job.
    #[error("missing artifact: {0}")]
    MissingArtifact(String),

    /// The state machine rejected a transition.
    #[error(transparent)]
    InvalidTransition(#[from] StatusError),

    /// Job registry error.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Asset retrieval collaborator failed.
    #[error("asset retrieval failed: {0}")]
    Assets(#[from] AssetError),

    /// Narration synthesis collaborator failed.
    #[error("narration synthesis failed: {0}")]
    Speech(#[from] SpeechError),

    /// Render collaborator failed.
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// How a job's orchestration ended.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    /// All stages ran; the result descriptor is cached.
    Completed(VideoResult),
    /// A cancellation was observed before a stage started; the pipeline
    /// stopped without touching further stages.
    Cancelled,
}

/// Point-in-time orchestrator status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    /// Jobs currently holding a concurrency slot.
    pub active_jobs: usize,
    /// Concurrency limit.
    pub max_concurrent_jobs: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_display() {
        let err = OrchestratorError::MissingArtifact("storyboard:job-1".to_string());
        assert_eq!(err.to_string(), "missing artifact: storyboard:job-1");
    }

    #[test]
    fn test_collaborator_errors_carry_source_message() {
        let err = OrchestratorError::Assets(AssetError::Transport("connection reset".into()));
        assert_eq!(
            err.to_string(),
            "asset retrieval failed: transport failure: connection reset"
        );

        let err = OrchestratorError::Speech(SpeechError::Synthesis("voice missing".into()));
        assert_eq!(
            err.to_string(),
            "narration synthesis failed: speech synthesis failed: voice missing"
        );
    }
}
