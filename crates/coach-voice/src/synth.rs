use crate::error::VoiceError;
use async_trait::async_trait;

/// Anything that can turn reply text into playable audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesizes `text` and returns the encoded audio (MP3 by default).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError>;
}
