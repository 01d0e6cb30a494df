//! Speech-to-text capture as an input source.

use serde::{Deserialize, Serialize};

/// Latest state of an external speech-to-text capture.
///
/// The recognizer keeps rewriting `transcript` while `listening` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechCapture {
    pub transcript: String,
    pub listening: bool,
}

impl SpeechCapture {
    pub fn new(transcript: impl Into<String>, listening: bool) -> Self {
        Self {
            transcript: transcript.into(),
            listening,
        }
    }

    /// Clears the transcript once it has been sent.
    pub fn reset(&mut self) {
        self.transcript.clear();
    }
}

/// Picks the text to send.
///
/// Typed text wins when both sources have something. Blank text counts as
/// nothing; `None` means there is nothing to send.
pub fn resolve_outgoing_text(typed: &str, capture: Option<&SpeechCapture>) -> Option<String> {
    if !typed.trim().is_empty() {
        return Some(typed.to_string());
    }
    capture
        .map(|c| c.transcript.as_str())
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
}
