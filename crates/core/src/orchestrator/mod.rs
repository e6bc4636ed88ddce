//! Pipeline orchestrator.
//!
//! Drives each job through the status state machine: scene planning runs
//! in-process, asset retrieval / narration synthesis / rendering are
//! delegated to collaborator interfaces, and intermediate artifacts move
//! between stages through the TTL cache. One task per job; the cache is the
//! only state shared across jobs.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::{
    result_key, storyboard_key, PipelineOrchestrator, PROGRESS_ASSETS, PROGRESS_AUDIO,
    PROGRESS_PLANNED, PROGRESS_RENDERED,
};
pub use types::{JobOutcome, OrchestratorError, OrchestratorStatus};
