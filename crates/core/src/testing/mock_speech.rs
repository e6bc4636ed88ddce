//! Mock narration synthesis for testing.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::job::AudioSegment;
use crate::speech::timing::{chunk_subtitles, estimate_duration};
use crate::speech::{Narration, SpeechError, SpeechSynthesizer, TtsEngine};

/// Mock implementation of the [`SpeechSynthesizer`] trait.
///
/// Produces deterministic timing-based narrations, records every call for
/// assertions, and can simulate delays and synthesis failures.
pub struct MockSynthesizer {
    recorded: RwLock<Vec<(String, String)>>,
    next_error: RwLock<Option<SpeechError>>,
    delay: RwLock<Duration>,
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSynthesizer {
    /// Create a mock synthesizer.
    pub fn new() -> Self {
        Self {
            recorded: RwLock::new(Vec::new()),
            next_error: RwLock::new(None),
            delay: RwLock::new(Duration::ZERO),
        }
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: SpeechError) {
        *self.next_error.write().await = Some(error);
    }

    /// Simulate slow synthesis.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// The `(text, language)` pairs this synthesizer was called with.
    pub async fn recorded_calls(&self) -> Vec<(String, String)> {
        self.recorded.read().await.clone()
    }

    /// Number of calls made.
    pub async fn call_count(&self) -> usize {
        self.recorded.read().await.len()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn engine(&self) -> TtsEngine {
        TtsEngine::Gtts
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Narration, SpeechError> {
        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.recorded
            .write()
            .await
            .push((text.to_string(), language.to_string()));

        Ok(Narration {
            segment: AudioSegment {
                id: Uuid::new_v4().to_string(),
                text: text.to_string(),
                audio_url: Some("s3://audio/mock/narration.mp3".to_string()),
                duration: estimate_duration(text),
                start_time: 0.0,
                language: language.to_string(),
                speaker: "narrator".to_string(),
            },
            subtitles: chunk_subtitles(text, "narrator"),
        })
    }
}
