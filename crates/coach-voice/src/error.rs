use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("Speech proxy error: {0}")]
    Proxy(String),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Audio error: {0}")]
    Audio(#[from] coach_types::AudioReferenceError),

    #[error("Playback error: {0}")]
    Playback(String),
}

impl From<reqwest::Error> for VoiceError {
    /// Drops the request URL, which may carry credentials or internal hosts.
    fn from(e: reqwest::Error) -> Self {
        VoiceError::Http(e.without_url())
    }
}
