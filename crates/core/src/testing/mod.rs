//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of all collaborator traits,
//! allowing comprehensive pipeline testing without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use storyreel_core::testing::{MockAssetRetriever, MockRenderer, MockSynthesizer};
//!
//! let assets = MockAssetRetriever::new();
//! let speech = MockSynthesizer::new();
//! let renderer = MockRenderer::new();
//!
//! // Configure mock behavior
//! assets.set_clips(vec![/* clips */]).await;
//! renderer.set_delay(Duration::from_millis(50)).await;
//!
//! // Hand to PipelineOrchestrator::new...
//! ```

mod mock_assets;
mod mock_renderer;
mod mock_speech;
mod recording_notifier;

pub use mock_assets::{MockAssetRetriever, MockStockFootage};
pub use mock_renderer::MockRenderer;
pub use mock_speech::MockSynthesizer;
pub use recording_notifier::RecordingNotifier;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::assets::StockClip;
    use crate::job::{Scene, ShotType, Storyboard, VideoRequest};

    /// Create a test request with reasonable defaults.
    pub fn request(prompt: &str, duration_target: u32) -> VideoRequest {
        VideoRequest::new(prompt, duration_target)
    }

    /// Create a test stock clip with the given duration.
    pub fn clip(id: &str, duration: f64) -> StockClip {
        StockClip {
            id: id.to_string(),
            url: format!("https://stock.example.com/videos/{}", id),
            video_url: format!("https://cdn.example.com/{}.mp4", id),
            duration,
            width: 1920,
            height: 1080,
            user_name: "Test Uploader".to_string(),
            user_url: "https://stock.example.com/@test".to_string(),
            description: String::new(),
        }
    }

    /// Create a test scene with the given description and duration.
    pub fn scene(description: &str, duration: f64) -> Scene {
        Scene {
            id: uuid::Uuid::new_v4().to_string(),
            description: description.to_string(),
            duration,
            keywords: Vec::new(),
            shot_type: ShotType::General,
            narration: description.to_string(),
            clip: None,
            start_time: 0.0,
            end_time: duration,
        }
    }

    /// Create a test storyboard with `scene_count` even scenes.
    pub fn storyboard(job_id: &str, scene_count: usize, total_duration: f64) -> Storyboard {
        let scene_duration = total_duration / scene_count as f64;
        let scenes = (0..scene_count)
            .map(|i| {
                let mut s = scene(&format!("Scene {}", i + 1), scene_duration);
                s.start_time = i as f64 * scene_duration;
                s.end_time = (i + 1) as f64 * scene_duration;
                s
            })
            .collect();
        Storyboard::new(job_id, "test prompt", scenes, total_duration)
    }
}
