//! TTS engine selection.

use serde::{Deserialize, Serialize};

/// The closed set of supported TTS engines.
///
/// Engine names arrive as free-form strings from configuration; unknown
/// names degrade to the default engine instead of failing, so a deployment
/// with a typo'd engine name still produces narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtsEngine {
    #[default]
    Gtts,
    Azure,
    Aws,
}

impl TtsEngine {
    /// Resolve an engine from its configured name.
    ///
    /// Unknown names fall back to [`TtsEngine::Gtts`] with a warning.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gtts" => TtsEngine::Gtts,
            "azure" => TtsEngine::Azure,
            "aws" => TtsEngine::Aws,
            other => {
                tracing::warn!(
                    "unknown tts engine '{}', falling back to '{}'",
                    other,
                    TtsEngine::default().as_str()
                );
                TtsEngine::default()
            }
        }
    }

    /// The configured name of this engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsEngine::Gtts => "gtts",
            TtsEngine::Azure => "azure",
            TtsEngine::Aws => "aws",
        }
    }
}

impl std::fmt::Display for TtsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TtsEngine {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TtsEngine {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(TtsEngine::from_name(&name))
    }
}
