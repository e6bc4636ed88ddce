//! Heuristic scene planner.
//!
//! Pure function from a text prompt to an ordered storyboard scene list.
//! The planner splits the prompt into sentence units, distributes them
//! across a bounded number of scenes, splits the target duration evenly,
//! and tags each scene with extracted keywords and a shot type. Timing is
//! distributed by sentence index, not by text length; this keeps the
//! planner a cheap approximation and narration timing is refined later by
//! the audio stage.
//!
//! The planner never fails: a degenerate (empty/whitespace) prompt yields a
//! single scene spanning the full target duration.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use uuid::Uuid;

use crate::job::{Scene, ShotType};

/// Maximum keywords attached to a scene.
const MAX_KEYWORDS: usize = 5;

/// Assumed minimum scene length in seconds, caps the default scene count.
const MIN_SCENE_SECS: u32 = 5;

static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Common words excluded from keyword extraction.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "is",
    "are", "was", "were", "be", "been", "do", "did",
];

const CLOSE_UP_CUES: &[&str] = &["close", "detail", "face", "hand"];
const AERIAL_CUES: &[&str] = &["aerial", "sky", "bird", "drone", "above"];
const SLOW_MOTION_CUES: &[&str] = &["slow", "smooth", "graceful"];
const FAST_MOTION_CUES: &[&str] = &["quick", "fast", "rapid"];

/// Plans video scenes from text prompts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenePlanner;

impl ScenePlanner {
    /// Create a planner.
    pub fn new() -> Self {
        Self
    }

    /// Break a prompt into an ordered list of scenes.
    ///
    /// `scene_count` overrides the heuristic count when given (clamped to at
    /// least one scene). Scene durations always sum to `target_duration`.
    pub fn plan(
        &self,
        prompt: &str,
        target_duration: u32,
        scene_count: Option<usize>,
    ) -> Vec<Scene> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return vec![full_span_scene(trimmed, target_duration)];
        }

        let mut sentences: Vec<&str> = SENTENCE_SPLIT
            .split(prompt)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if sentences.is_empty() {
            sentences.push(trimmed);
        }

        let count = scene_count.map(|c| c.max(1)).unwrap_or_else(|| {
            let by_duration = (target_duration / MIN_SCENE_SECS) as usize;
            2.max(sentences.len().min(by_duration))
        });

        let units_per_scene = 1.max(sentences.len() / count);
        let scene_duration = target_duration as f64 / count as f64;

        let mut scenes = Vec::with_capacity(count);
        for i in 0..count {
            let start_idx = (i * units_per_scene).min(sentences.len());
            // the last scene absorbs the remainder of an uneven division
            let end_idx = if i + 1 == count {
                sentences.len()
            } else {
                ((i + 1) * units_per_scene).min(sentences.len())
            };
            let text = sentences[start_idx..end_idx].join(" ");

            let scene = Scene {
                id: Uuid::new_v4().to_string(),
                keywords: extract_keywords(&text, MAX_KEYWORDS),
                shot_type: classify_shot(&text),
                narration: text.clone(),
                description: text,
                duration: scene_duration,
                clip: None,
                start_time: i as f64 * scene_duration,
                end_time: (i + 1) as f64 * scene_duration,
            };
            tracing::debug!(
                scene = i + 1,
                shot_type = %scene.shot_type,
                "planned scene"
            );
            scenes.push(scene);
        }

        scenes
    }
}

fn full_span_scene(text: &str, target_duration: u32) -> Scene {
    Scene {
        id: Uuid::new_v4().to_string(),
        description: text.to_string(),
        duration: target_duration as f64,
        keywords: Vec::new(),
        shot_type: ShotType::General,
        narration: text.to_string(),
        clip: None,
        start_time: 0.0,
        end_time: target_duration as f64,
    }
}

/// Extract up to `max` keywords from text.
///
/// Keywords are lowercased tokens longer than 3 characters that are not
/// stop words, stripped of surrounding punctuation and de-duplicated in
/// first-occurrence order.
fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();
    for raw in lowered.split_whitespace() {
        if raw.len() <= 3 || STOP_WORDS.contains(&raw) {
            continue;
        }
        let word = raw.trim_matches(|c| ",.!?;:".contains(c));
        if word.is_empty() || keywords.iter().any(|k| k == word) {
            continue;
        }
        keywords.push(word.to_string());
        if keywords.len() == max {
            break;
        }
    }
    keywords
}

/// Classify the shot type from text cues; the first matching rule wins.
fn classify_shot(text: &str) -> ShotType {
    let lowered = text.to_lowercase();
    let contains_any = |cues: &[&str]| cues.iter().any(|cue| lowered.contains(cue));

    if contains_any(CLOSE_UP_CUES) {
        ShotType::CloseUp
    } else if contains_any(AERIAL_CUES) {
        ShotType::Aerial
    } else if contains_any(SLOW_MOTION_CUES) {
        ShotType::SlowMotion
    } else if contains_any(FAST_MOTION_CUES) {
        ShotType::FastMotion
    } else {
        ShotType::General
    }
}
