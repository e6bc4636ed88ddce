//! Narration synthesis.
//!
//! The orchestrator consumes the narrow [`SpeechSynthesizer`] contract. The
//! crate ships [`TimedNarrator`], which plans narration timing and subtitle
//! chunking without touching an audio backend; real TTS engines plug in
//! behind the same trait, selected through the closed [`TtsEngine`] enum.

mod engine;
mod narrator;
pub mod timing;

pub use engine::TtsEngine;
pub use narrator::TimedNarrator;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::job::{AudioSegment, Subtitle};

/// Error type for narration synthesis.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// The synthesis backend failed.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// The selected engine is not available in this deployment.
    #[error("tts engine unavailable: {0}")]
    EngineUnavailable(String),
}

/// Narration produced for a piece of text: one audio segment plus its
/// subtitle track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Narration {
    /// The synthesized audio segment.
    pub segment: AudioSegment,
    /// Subtitles aligned to the segment, ordered and non-overlapping.
    pub subtitles: Vec<Subtitle>,
}

/// A narration synthesis backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// The engine this synthesizer uses.
    fn engine(&self) -> TtsEngine;

    /// Synthesize narration for `text` in `language`.
    async fn synthesize(&self, text: &str, language: &str) -> Result<Narration, SpeechError>;
}
