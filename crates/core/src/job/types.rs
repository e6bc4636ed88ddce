//! Core job data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::status::JobStatus;

// ============================================================================
// Request
// ============================================================================

/// An incoming video generation request.
///
/// Immutable once created: the orchestrator receives it by reference and
/// never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRequest {
    /// Unique identifier (UUID).
    pub id: String,
    /// The text prompt to turn into a video.
    pub prompt: String,
    /// Target video duration in seconds.
    pub duration_target: u32,
    /// Visual style (e.g. "cinematic", "social", "broadcast").
    pub style: String,
    /// Narration voice identifier.
    pub voice: String,
    /// Narration language (ISO 639-1 code).
    pub language: String,
    /// Explicit scene count override. None lets the planner decide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_count: Option<usize>,
    /// Webhook URL to call with the result on completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// Priority for queue ordering (1-10, higher is more important).
    pub priority: u8,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl VideoRequest {
    /// Create a request with default style/voice/language and priority 5.
    pub fn new(prompt: impl Into<String>, duration_target: u32) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            duration_target,
            style: "cinematic".to_string(),
            voice: "en-US-neutral".to_string(),
            language: "en".to_string(),
            scene_count: None,
            callback_url: None,
            priority: 5,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set an explicit scene count.
    pub fn with_scene_count(mut self, count: usize) -> Self {
        self.scene_count = Some(count);
        self
    }

    /// Set a completion webhook URL.
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Set the priority (clamped to 1-10).
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(1, 10);
        self
    }

    /// Set the narration language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the visual style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Mutable progress record for a job.
///
/// Exactly one orchestration routine holds mutation rights to a given
/// progress record (see [`crate::job::JobRegistry`]); everything else reads
/// snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobProgress {
    /// Job identifier, matches the originating [`VideoRequest`].
    pub job_id: String,
    /// Current pipeline status.
    pub status: JobStatus,
    /// Overall progress percentage (0-100, monotonically non-decreasing
    /// while the job is not failed/cancelled).
    pub overall_progress: f32,
    /// Human-readable description of the current step.
    pub current_step: String,
    /// Ordered log of textual job events.
    pub logs: Vec<String>,
    /// Estimated time remaining in seconds.
    pub estimated_time_remaining: f32,
    /// Scenes processed so far in the current stage.
    pub scenes_processed: usize,
    /// Total scenes in the storyboard.
    pub total_scenes: usize,
    /// Error message, set when the job fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl JobProgress {
    /// Create a fresh progress record at `pending`/0%.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Pending,
            overall_progress: 0.0,
            current_step: String::new(),
            logs: Vec::new(),
            estimated_time_remaining: 0.0,
            scenes_processed: 0,
            total_scenes: 0,
            error: None,
            updated_at: Utc::now(),
        }
    }
}

// ============================================================================
// Storyboard
// ============================================================================

/// Shot type classification for a scene.
///
/// Wire names use hyphens (`close-up`, `slow-motion`) to match the values
/// consumed by the renderer and the stock footage queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShotType {
    CloseUp,
    Aerial,
    SlowMotion,
    FastMotion,
    General,
}

impl ShotType {
    /// Returns the wire-format string for this shot type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShotType::CloseUp => "close-up",
            ShotType::Aerial => "aerial",
            ShotType::SlowMotion => "slow-motion",
            ShotType::FastMotion => "fast-motion",
            ShotType::General => "general",
        }
    }
}

impl std::fmt::Display for ShotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a resolved stock clip, attached to a scene during asset
/// retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipRef {
    /// Provider-side clip identifier.
    pub clip_id: String,
    /// Direct URL of the playable clip file.
    pub video_url: String,
    /// Clip duration in seconds.
    pub duration: f64,
}

/// A single scene in the video timeline.
///
/// Created by the scene planner; later stages attach clip and audio
/// references but never alter duration or ordering once the storyboard is
/// committed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    /// Unique identifier (UUID).
    pub id: String,
    /// Scene description text (the sentence units assigned to this scene).
    pub description: String,
    /// Scene duration in seconds.
    pub duration: f64,
    /// Extracted keywords (at most 5).
    pub keywords: Vec<String>,
    /// Shot type classification.
    pub shot_type: ShotType,
    /// Narration text for this scene.
    pub narration: String,
    /// Resolved stock clip, if asset retrieval found one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipRef>,
    /// Offset of the scene start within the timeline, in seconds.
    pub start_time: f64,
    /// Offset of the scene end within the timeline, in seconds.
    pub end_time: f64,
}

/// An audio segment with timing information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioSegment {
    /// Unique identifier (UUID).
    pub id: String,
    /// Narrated text.
    pub text: String,
    /// URL of the synthesized audio file, if uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Segment duration in seconds.
    pub duration: f64,
    /// Offset within the timeline, in seconds.
    pub start_time: f64,
    /// Narration language.
    pub language: String,
    /// Speaker track this segment belongs to.
    pub speaker: String,
}

/// A subtitle entry with millisecond timing.
///
/// Subtitles within a speaker track are monotonically ordered and
/// non-overlapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subtitle {
    /// Subtitle text.
    pub text: String,
    /// Start offset in milliseconds.
    pub start_ms: u64,
    /// End offset in milliseconds.
    pub end_ms: u64,
    /// Speaker track this subtitle belongs to.
    pub speaker: String,
}

/// Complete storyboard for a video job.
///
/// Created once at the end of planning, then incrementally enriched with
/// clip references, audio segments and subtitles by later stages. The whole
/// aggregate is re-persisted to the artifact cache after each enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Storyboard {
    /// Job identifier.
    pub job_id: String,
    /// The original prompt.
    pub prompt: String,
    /// Ordered scene list.
    pub scenes: Vec<Scene>,
    /// Total timeline duration in seconds.
    pub total_duration: f64,
    /// Narration audio segments, attached during audio processing.
    #[serde(default)]
    pub audio_segments: Vec<AudioSegment>,
    /// Subtitle entries, attached during audio processing.
    #[serde(default)]
    pub subtitles: Vec<Subtitle>,
}

impl Storyboard {
    /// Create a storyboard with no audio attached yet.
    pub fn new(
        job_id: impl Into<String>,
        prompt: impl Into<String>,
        scenes: Vec<Scene>,
        total_duration: f64,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            prompt: prompt.into(),
            scenes,
            total_duration,
            audio_segments: Vec::new(),
            subtitles: Vec::new(),
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// The final result descriptor for a completed job, persisted under the
/// `result:<jobId>` cache key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoResult {
    /// Job identifier.
    pub job_id: String,
    /// URL of the rendered video.
    pub video_url: String,
    /// URL of the thumbnail image, if one was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Container format (e.g. "mp4").
    pub format: String,
    /// Final video duration in seconds.
    pub duration: f64,
    /// When the video was generated.
    pub generated_at: DateTime<Utc>,
    /// Free-form metadata attached by the renderer.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = VideoRequest::new("A city at night", 30);
        assert_eq!(request.duration_target, 30);
        assert_eq!(request.style, "cinematic");
        assert_eq!(request.voice, "en-US-neutral");
        assert_eq!(request.language, "en");
        assert_eq!(request.priority, 5);
        assert!(request.scene_count.is_none());
        assert!(request.callback_url.is_none());
        assert!(!request.id.is_empty());
    }

    #[test]
    fn test_request_builder() {
        let request = VideoRequest::new("prompt", 60)
            .with_scene_count(4)
            .with_callback_url("https://example.com/hook")
            .with_priority(20)
            .with_language("it")
            .with_style("social");
        assert_eq!(request.scene_count, Some(4));
        assert_eq!(request.callback_url.as_deref(), Some("https://example.com/hook"));
        assert_eq!(request.priority, 10); // clamped
        assert_eq!(request.language, "it");
        assert_eq!(request.style, "social");
    }

    #[test]
    fn test_progress_starts_pending() {
        let progress = JobProgress::new("job-1");
        assert_eq!(progress.status, JobStatus::Pending);
        assert_eq!(progress.overall_progress, 0.0);
        assert!(progress.error.is_none());
        assert!(progress.logs.is_empty());
    }

    #[test]
    fn test_shot_type_wire_names() {
        assert_eq!(ShotType::CloseUp.as_str(), "close-up");
        assert_eq!(ShotType::SlowMotion.as_str(), "slow-motion");
        assert_eq!(
            serde_json::to_string(&ShotType::FastMotion).unwrap(),
            "\"fast-motion\""
        );
        let parsed: ShotType = serde_json::from_str("\"aerial\"").unwrap();
        assert_eq!(parsed, ShotType::Aerial);
    }

    #[test]
    fn test_storyboard_serialization_roundtrip() {
        let scene = Scene {
            id: "scene-1".to_string(),
            description: "A calm lake at dawn".to_string(),
            duration: 5.0,
            keywords: vec!["calm".to_string(), "lake".to_string(), "dawn".to_string()],
            shot_type: ShotType::General,
            narration: "A calm lake at dawn".to_string(),
            clip: Some(ClipRef {
                clip_id: "42".to_string(),
                video_url: "https://clips.example.com/42.mp4".to_string(),
                duration: 6.0,
            }),
            start_time: 0.0,
            end_time: 5.0,
        };
        let storyboard = Storyboard::new("job-1", "A calm lake at dawn.", vec![scene], 5.0);

        let json = serde_json::to_string(&storyboard).unwrap();
        assert!(json.contains("\"shot_type\":\"general\""));
        let parsed: Storyboard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, storyboard);
    }

    #[test]
    fn test_empty_audio_lists_deserialize_as_default() {
        let json = r#"{
            "job_id": "j",
            "prompt": "p",
            "scenes": [],
            "total_duration": 10.0
        }"#;
        let storyboard: Storyboard = serde_json::from_str(json).unwrap();
        assert!(storyboard.audio_segments.is_empty());
        assert!(storyboard.subtitles.is_empty());
    }
}
