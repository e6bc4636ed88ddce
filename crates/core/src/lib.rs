//! Core orchestration pipeline for prompt-to-video generation.
//!
//! A job moves through four stages: scene planning, asset retrieval, audio
//! processing and rendering. Planning is internal; the other stages are
//! delegated to collaborator traits ([`assets::AssetRetrieval`],
//! [`speech::SpeechSynthesizer`], [`render::Renderer`]). Intermediate
//! artifacts are handed between stages through a TTL cache, and progress is
//! published to external observers through [`notify::EventNotifier`].

pub mod assets;
pub mod cache;
pub mod config;
pub mod job;
pub mod metrics;
pub mod notify;
pub mod orchestrator;
pub mod planner;
pub mod render;
pub mod speech;
pub mod testing;

pub use assets::{AssetRetrieval, ClipSelector, PexelsClient, StockFootage};
pub use cache::TtlCache;
pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError};
pub use job::{
    JobFilter, JobProgress, JobRegistry, JobStatus, JobSummary, JobView, ProgressHandle,
    Scene, ShotType, Storyboard, VideoRequest, VideoResult,
};
pub use notify::{ChannelNotifier, EventNotifier, JobEvent, NullNotifier, WebhookClient};
pub use orchestrator::{
    OrchestratorConfig, OrchestratorError, OrchestratorStatus, PipelineOrchestrator,
};
pub use planner::ScenePlanner;
pub use render::{Quality, RenderTarget, RenderedVideo, Renderer};
pub use speech::{SpeechSynthesizer, TimedNarrator, TtsEngine};
