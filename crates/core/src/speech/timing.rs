//! Narration timing estimation.
//!
//! Word-level timing assumes a steady 150 words per minute; subtitles group
//! consecutive words into fixed-size chunks. All estimates are refined by
//! transcription when a real speech backend is wired in; the pipeline only
//! relies on the ordering and non-overlap guarantees.

use crate::job::Subtitle;

/// Assumed narration pace.
pub const WORDS_PER_MINUTE: f64 = 150.0;

/// Seconds per word at the assumed pace.
pub const SECONDS_PER_WORD: f64 = 60.0 / WORDS_PER_MINUTE;

/// Words grouped into one subtitle entry.
pub const SUBTITLE_CHUNK_WORDS: usize = 8;

/// A single word with estimated start/end offsets in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct WordTiming {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Estimated duration of narrating `text`, in seconds.
pub fn estimate_duration(text: &str) -> f64 {
    text.split_whitespace().count() as f64 * SECONDS_PER_WORD
}

/// Estimate word-level timings for alignment.
pub fn word_timings(text: &str) -> Vec<WordTiming> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| WordTiming {
            text: word.to_string(),
            start: i as f64 * SECONDS_PER_WORD,
            end: (i + 1) as f64 * SECONDS_PER_WORD,
        })
        .collect()
}

/// Group words into subtitle entries of [`SUBTITLE_CHUNK_WORDS`] words.
///
/// Entries are monotonically ordered and non-overlapping: each chunk ends
/// exactly where the next one starts.
pub fn chunk_subtitles(text: &str, speaker: &str) -> Vec<Subtitle> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(SUBTITLE_CHUNK_WORDS)
        .enumerate()
        .map(|(i, chunk)| {
            let first_word = i * SUBTITLE_CHUNK_WORDS;
            let start = first_word as f64 * SECONDS_PER_WORD;
            let end = (first_word + chunk.len()) as f64 * SECONDS_PER_WORD;
            Subtitle {
                text: chunk.join(" "),
                start_ms: (start * 1000.0).round() as u64,
                end_ms: (end * 1000.0).round() as u64,
                speaker: speaker.to_string(),
            }
        })
        .collect()
}
