//! Rendering collaborator contract.
//!
//! The encoder itself lives outside this crate; the orchestrator only
//! depends on the [`Renderer`] trait. Implementations are expected to take
//! substantial wall-clock time and must give up by the caller-supplied
//! deadline.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::job::Storyboard;

/// Error type for render operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The render backend failed.
    #[error("render failed: {0}")]
    Failed(String),

    /// The render did not finish within the caller-supplied deadline.
    #[error("render deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    /// The render backend is not available.
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
}

/// Encoding quality preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Ultrafast,
    Fast,
    #[default]
    Medium,
    Slow,
}

impl Quality {
    /// The preset name handed to the encoder.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Ultrafast => "ultrafast",
            Quality::Fast => "fast",
            Quality::Medium => "medium",
            Quality::Slow => "slow",
        }
    }
}

/// Where the rendered output should land.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderTarget {
    /// URL the video file is written to.
    pub output_url: String,
    /// URL the thumbnail is written to.
    pub thumbnail_url: String,
    /// Container format (e.g. "mp4").
    pub format: String,
}

/// Descriptor of a successfully rendered video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedVideo {
    /// URL of the rendered video.
    pub video_url: String,
    /// URL of the thumbnail, if one was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Container format.
    pub format: String,
    /// Final duration in seconds.
    pub duration: f64,
    /// Free-form metadata from the backend (codec, bitrate, size).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

/// A video composition backend.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Returns the name of this renderer implementation.
    fn name(&self) -> &str;

    /// Render the storyboard to the target.
    ///
    /// Must return [`RenderError::DeadlineExceeded`] rather than keep
    /// working past `deadline`.
    async fn render(
        &self,
        storyboard: &Storyboard,
        target: &RenderTarget,
        quality: Quality,
        deadline: Duration,
    ) -> Result<RenderedVideo, RenderError>;
}
