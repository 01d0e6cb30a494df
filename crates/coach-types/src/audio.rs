//! Playable audio handles.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const MP3_DATA_URI_PREFIX: &str = "data:audio/mp3;base64,";

/// Errors raised when decoding an [`AudioReference`].
#[derive(Debug, Error)]
pub enum AudioReferenceError {
    #[error("audio reference is not an mp3 data URI")]
    UnsupportedScheme,

    #[error("audio reference payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// An opaque handle to synthesized audio.
///
/// Stored as a `data:audio/mp3;base64,...` URI so a browser can play it
/// directly and a terminal player can decode it back to bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioReference(String);

impl AudioReference {
    /// Wraps MP3 bytes as a data URI.
    pub fn from_mp3_bytes(bytes: &[u8]) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self(format!("{MP3_DATA_URI_PREFIX}{encoded}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the MP3 bytes.
    pub fn decode(&self) -> Result<Vec<u8>, AudioReferenceError> {
        let payload = self
            .0
            .strip_prefix(MP3_DATA_URI_PREFIX)
            .ok_or(AudioReferenceError::UnsupportedScheme)?;
        Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
    }
}

impl fmt::Debug for AudioReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Payloads run to hundreds of kilobytes; keep logs readable.
        f.debug_tuple("AudioReference")
            .field(&format_args!("{} chars", self.0.len()))
            .finish()
    }
}

impl fmt::Display for AudioReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
