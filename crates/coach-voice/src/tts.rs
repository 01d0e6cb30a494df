use crate::config::CloudTtsConfig;
use crate::error::VoiceError;
use crate::synth::SpeechSynthesizer;
use async_trait::async_trait;
use base64::Engine;
use coach_types::voice::{AudioEncoding, SsmlGender, VoiceSelection};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum text input size for one synthesis request (5000 bytes, the
/// provider's own limit). Checked before any network call.
pub const MAX_TTS_INPUT_BYTES: usize = 5000;

/// Header carrying the provider API key. Kept out of the URL so transport
/// errors, which print the URL, never contain it.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest slice of an upstream error body carried into a `VoiceError`.
const MAX_ERROR_BODY_CHARS: usize = 256;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceParams<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: SsmlGender,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: AudioEncoding,
    speaking_rate: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

impl<'a> SynthesizeRequest<'a> {
    fn new(text: &'a str, voice: &'a VoiceSelection) -> Self {
        Self {
            input: SynthesisInput { text },
            voice: VoiceParams {
                language_code: &voice.language_code,
                name: &voice.name,
                ssml_gender: voice.ssml_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: voice.audio_encoding,
                speaking_rate: voice.speaking_rate,
            },
        }
    }
}

/// Server-side client for the cloud text-to-speech API.
#[derive(Debug, Clone)]
pub struct CloudTtsService {
    config: CloudTtsConfig,
    client: reqwest::Client,
}

impl CloudTtsService {
    pub fn new(config: CloudTtsConfig) -> Result<Self, VoiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Returns `true` when credentials are configured.
    pub fn is_enabled(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    pub fn voice(&self) -> &VoiceSelection {
        &self.config.voice
    }

    fn validate(&self, text: &str) -> Result<(), VoiceError> {
        if text.trim().is_empty() {
            return Err(VoiceError::InvalidInput("text is empty".to_string()));
        }
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(VoiceError::InvalidInput(format!(
                "text exceeds maximum size: {} bytes (limit: {} bytes)",
                text.len(),
                MAX_TTS_INPUT_BYTES
            )));
        }
        if !(0.25..=4.0).contains(&self.config.voice.speaking_rate) {
            return Err(VoiceError::Config(
                "Speaking rate must be between 0.25 and 4.0".to_string(),
            ));
        }
        if !self.is_enabled() {
            return Err(VoiceError::Config(
                "TTS API key is not configured. Set speech.api_key in config \
                 or the COACH_TTS_API_KEY environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }

    async fn write_output(&self, audio: &[u8]) {
        let Some(path) = &self.config.output_path else {
            return;
        };
        match tokio::fs::write(path, audio).await {
            Ok(()) => tracing::debug!(path = %path.display(), bytes = audio.len(), "wrote synthesized audio"),
            Err(e) => tracing::warn!(path = %path.display(), "failed to write synthesized audio: {}", e),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for CloudTtsService {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        self.validate(text)?;

        let request = SynthesizeRequest::new(text, &self.config.voice);
        let response = self
            .client
            .post(&self.config.endpoint)
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(VoiceError::Tts(format!(
                "provider returned {}: {}",
                status, excerpt
            )));
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Tts(format!("malformed provider response: {}", e)))?;
        if body.audio_content.is_empty() {
            return Err(VoiceError::Tts("provider returned no audio".to_string()));
        }

        let audio = base64::engine::general_purpose::STANDARD
            .decode(body.audio_content.as_bytes())
            .map_err(|e| VoiceError::Tts(format!("audio content is not valid base64: {}", e)))?;

        tracing::info!(
            voice = %self.config.voice.name,
            chars = text.chars().count(),
            bytes = audio.len(),
            "text to speech completed"
        );

        self.write_output(&audio).await;
        Ok(audio)
    }
}
