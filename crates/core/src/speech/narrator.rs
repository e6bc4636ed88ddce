//! Timing-based narration planner.

use async_trait::async_trait;
use uuid::Uuid;

use crate::job::AudioSegment;

use super::timing::{chunk_subtitles, estimate_duration};
use super::{Narration, SpeechError, SpeechSynthesizer, TtsEngine};

/// Default speaker track name.
const DEFAULT_SPEAKER: &str = "narrator";

/// Synthesizer that produces a fully-timed narration plan without calling
/// an audio backend.
///
/// The audio URL on the produced segment stays empty; a downstream TTS
/// worker fills it in. This keeps the pipeline runnable in deployments
/// where no speech engine is configured.
pub struct TimedNarrator {
    engine: TtsEngine,
    speaker: String,
}

impl TimedNarrator {
    /// Create a narrator for the given engine.
    pub fn new(engine: TtsEngine) -> Self {
        Self {
            engine,
            speaker: DEFAULT_SPEAKER.to_string(),
        }
    }

    /// Use a custom speaker track name.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = speaker.into();
        self
    }
}

impl Default for TimedNarrator {
    fn default() -> Self {
        Self::new(TtsEngine::default())
    }
}

#[async_trait]
impl SpeechSynthesizer for TimedNarrator {
    fn engine(&self) -> TtsEngine {
        self.engine
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Narration, SpeechError> {
        let segment = AudioSegment {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            audio_url: None,
            duration: estimate_duration(text),
            start_time: 0.0,
            language: language.to_string(),
            speaker: self.speaker.clone(),
        };
        let subtitles = chunk_subtitles(text, &self.speaker);

        tracing::debug!(
            engine = %self.engine,
            words = text.split_whitespace().count(),
            subtitles = subtitles.len(),
            "narration planned"
        );

        Ok(Narration { segment, subtitles })
    }
}
