//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

use crate::render::Quality;

/// Configuration for the pipeline orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum jobs orchestrated concurrently; further submissions queue.
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,

    /// Deadline handed to the render collaborator, in seconds.
    #[serde(default = "default_render_deadline")]
    pub render_deadline_secs: u64,

    /// Encoding quality preset passed to the renderer.
    #[serde(default)]
    pub quality: Quality,

    /// Base URL results are written under
    /// (`<base>/<jobId>/output.mp4`, `<base>/<jobId>/thumbnail.jpg`).
    #[serde(default = "default_output_base_url")]
    pub output_base_url: String,
}

fn default_max_concurrent_jobs() -> usize {
    5
}

fn default_render_deadline() -> u64 {
    3600
}

fn default_output_base_url() -> String {
    "s3://videos".to_string()
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent_jobs(),
            render_deadline_secs: default_render_deadline(),
            quality: Quality::default(),
            output_base_url: default_output_base_url(),
        }
    }
}
