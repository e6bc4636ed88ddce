use serde::{Deserialize, Serialize};

use crate::assets::PexelsConfig;
use crate::notify::WebhookConfig;
use crate::orchestrator::OrchestratorConfig;
use crate::speech::TtsEngine;

/// Root configuration.
///
/// Every section has serde defaults, so an empty file (or no file at all)
/// yields a runnable configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// Artifact cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Default entry time-to-live in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_cache_ttl() -> u64 {
    86_400 // 24 hours
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
        }
    }
}

/// Scene planning bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannerConfig {
    /// Assumed scene length in seconds when nothing else constrains it.
    #[serde(default = "default_scene_duration")]
    pub default_scene_duration: f64,
    /// Minimum accepted target video duration in seconds.
    #[serde(default = "default_min_video_duration")]
    pub min_video_duration: u32,
    /// Maximum accepted target video duration in seconds.
    #[serde(default = "default_max_video_duration")]
    pub max_video_duration: u32,
}

fn default_scene_duration() -> f64 {
    5.0
}

fn default_min_video_duration() -> u32 {
    10
}

fn default_max_video_duration() -> u32 {
    600
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_scene_duration: default_scene_duration(),
            min_video_duration: default_min_video_duration(),
            max_video_duration: default_max_video_duration(),
        }
    }
}

/// Stock footage retrieval configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssetsConfig {
    /// Pexels provider settings.
    #[serde(default)]
    pub pexels: PexelsConfig,
}

/// Narration synthesis configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    /// TTS engine name; unknown names degrade to the default engine.
    #[serde(default)]
    pub engine: TtsEngine,
    /// Default narration language.
    #[serde(default = "default_language")]
    pub language: String,
    /// Default narration voice.
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_voice() -> String {
    "en-US-neutral".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: TtsEngine::default(),
            language: default_language(),
            voice: default_voice(),
        }
    }
}
