//! Voice selection for speech synthesis.
//!
//! A `VoiceSelection` names the cloud voice, its language, and the audio
//! format the proxy should return. The defaults reproduce the British
//! neural voice the coach has always spoken with.

use serde::{Deserialize, Serialize};

/// Gender hint passed to the synthesis provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SsmlGender {
    #[default]
    Female,
    Male,
    Neutral,
}

/// Audio container requested from the provider.
///
/// MP3 only. Audio references are `data:audio/mp3` URIs and the browser
/// client plays proxy bytes as MP3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    /// MP3 at 32 kbps.
    #[default]
    Mp3,
}

/// A voice configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSelection {
    /// BCP-47 language tag, e.g. `en-GB`.
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Provider voice name, e.g. `en-GB-Neural2-A`.
    #[serde(default = "default_voice_name")]
    pub name: String,
    #[serde(default)]
    pub ssml_gender: SsmlGender,
    #[serde(default)]
    pub audio_encoding: AudioEncoding,
    /// Speaking rate multiplier (1.0 is normal, provider range 0.25..=4.0).
    #[serde(default = "default_speaking_rate")]
    pub speaking_rate: f32,
}

fn default_language_code() -> String {
    "en-GB".to_string()
}

fn default_voice_name() -> String {
    "en-GB-Neural2-A".to_string()
}

fn default_speaking_rate() -> f32 {
    1.0
}

impl Default for VoiceSelection {
    fn default() -> Self {
        Self {
            language_code: default_language_code(),
            name: default_voice_name(),
            ssml_gender: SsmlGender::default(),
            audio_encoding: AudioEncoding::default(),
            speaking_rate: default_speaking_rate(),
        }
    }
}
