//! Transcript → provider request mapping.

use crate::transcript::Transcript;
use coach_types::{ChatMessage, CompletionRequest};

/// Builds completion requests for a fixed model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    model: String,
}

impl RequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Maps `transcript` and `persona` to a provider request.
    ///
    /// The system message comes first and is sent even when `persona` is
    /// empty. Turns follow in transcript order; turns without text (audio
    /// only) are left out, since replaying them would break the
    /// user/assistant alternation the provider expects.
    pub fn build(&self, transcript: &Transcript, persona: &str) -> CompletionRequest {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(ChatMessage::system(persona));
        messages.extend(transcript.iter().filter_map(|turn| {
            turn.spoken_text()
                .map(|text| ChatMessage::new(turn.speaker().role(), text))
        }));

        CompletionRequest {
            model: self.model.clone(),
            messages,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MODEL)
    }
}
