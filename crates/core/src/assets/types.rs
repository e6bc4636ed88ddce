//! Types for the asset retrieval module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::job::ClipRef;

/// Error type for asset retrieval operations.
///
/// Only transport and provider failures are errors; "no results" is a valid
/// outcome and surfaces as an empty clip list or an empty pick.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The provider is missing required configuration.
    #[error("stock footage provider not configured: {0}")]
    NotConfigured(String),

    /// The HTTP request to the provider failed.
    #[error("stock footage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("stock footage provider returned status {status}")]
    Status { status: u16 },

    /// A transport-level failure (used by non-HTTP implementations).
    #[error("transport failure: {0}")]
    Transport(String),
}

/// A stock clip returned by a footage provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockClip {
    /// Provider-side identifier.
    pub id: String,
    /// Provider page URL (for attribution).
    pub url: String,
    /// Direct URL of the playable clip file.
    pub video_url: String,
    /// Clip duration in seconds.
    pub duration: f64,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// Uploader name (for attribution).
    pub user_name: String,
    /// Uploader profile URL.
    pub user_url: String,
    /// The search query that produced this clip.
    pub description: String,
}

impl StockClip {
    /// The clip reference attached to a scene.
    pub fn to_ref(&self) -> ClipRef {
        ClipRef {
            clip_id: self.id.clone(),
            video_url: self.video_url.clone(),
            duration: self.duration,
        }
    }
}

/// The outcome of resolving footage for a single scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenePick {
    /// The scene this pick belongs to.
    pub scene_id: String,
    /// The selected clip, or `None` when the search came back empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipRef>,
    /// The query used against the footage provider.
    pub query: String,
    /// How well the clip duration matches the scene duration (1.0 = exact;
    /// 0.0 when no clip was found).
    pub match_score: f64,
}
