//! Shared types for the Sales Coach workspace.
//!
//! This crate holds the conversation model (turns, speakers, exchange state)
//! and the wire shapes exchanged with the chat-completion provider and the
//! speech proxy. Every other crate in the workspace builds on these types;
//! this crate depends on nothing internal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod audio;
pub mod completion;
pub mod speech;
pub mod voice;

pub use audio::{AudioReference, AudioReferenceError};
pub use completion::{ChatMessage, ChatRole, CompletionChoice, CompletionRequest, CompletionResponse};
pub use speech::{AudioBuffer, SpeechRequest, SpeechResponse};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The person practising.
    User,
    /// The chat-completion provider.
    Assistant,
}

impl Speaker {
    /// Returns the provider role a turn from this speaker is replayed as.
    pub fn role(self) -> ChatRole {
        match self {
            Self::User => ChatRole::User,
            Self::Assistant => ChatRole::Assistant,
        }
    }
}

/// Which side of the chat window a turn is drawn on.
///
/// Display-only. Never sent to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Incoming,
    Outgoing,
}

/// Errors raised when constructing a [`Turn`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    /// Neither text nor an audio reference was supplied.
    #[error("a turn needs text or an audio reference")]
    Empty,
}

/// One utterance in a conversation.
///
/// A turn always carries text, an audio reference, or both. Fields are
/// private so that a turn cannot be edited once it is in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    speaker: Speaker,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_reference: Option<AudioReference>,
    direction: Direction,
}

impl Turn {
    /// Builds a turn from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::Empty`] if both `text` and `audio_reference` are
    /// `None`.
    pub fn new(
        speaker: Speaker,
        text: Option<String>,
        audio_reference: Option<AudioReference>,
    ) -> Result<Self, TurnError> {
        if text.is_none() && audio_reference.is_none() {
            return Err(TurnError::Empty);
        }
        let direction = match speaker {
            Speaker::User => Direction::Outgoing,
            Speaker::Assistant => Direction::Incoming,
        };
        Ok(Self {
            speaker,
            text,
            audio_reference,
            direction,
        })
    }

    /// An outgoing user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: Some(text.into()),
            audio_reference: None,
            direction: Direction::Outgoing,
        }
    }

    /// An assistant turn carrying reply text.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: Some(text.into()),
            audio_reference: None,
            direction: Direction::Incoming,
        }
    }

    /// An assistant turn carrying only synthesized audio.
    pub fn assistant_audio(reference: AudioReference) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: None,
            audio_reference: Some(reference),
            direction: Direction::Incoming,
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn audio_reference(&self) -> Option<&AudioReference> {
        self.audio_reference.as_ref()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the text if it is present and non-empty.
    pub fn spoken_text(&self) -> Option<&str> {
        self.text().filter(|t| !t.is_empty())
    }
}

/// Whether a session is waiting on the completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeState {
    #[default]
    Idle,
    AwaitingReply,
}

impl ExchangeState {
    pub fn is_awaiting(self) -> bool {
        matches!(self, Self::AwaitingReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_requires_some_content() {
        assert_eq!(Turn::new(Speaker::User, None, None), Err(TurnError::Empty));
        assert!(Turn::new(Speaker::User, Some("hi".to_string()), None).is_ok());
    }

    #[test]
    fn direction_follows_speaker() {
        assert_eq!(Turn::user("hi").direction(), Direction::Outgoing);
        assert_eq!(Turn::assistant("hello").direction(), Direction::Incoming);

        let audio = AudioReference::from_mp3_bytes(&[1, 2, 3]);
        let turn = Turn::new(Speaker::Assistant, None, Some(audio)).unwrap();
        assert_eq!(turn.direction(), Direction::Incoming);
    }

    #[test]
    fn spoken_text_skips_empty_and_missing_text() {
        assert_eq!(Turn::user("").spoken_text(), None);
        let audio_only = Turn::assistant_audio(AudioReference::from_mp3_bytes(&[9]));
        assert_eq!(audio_only.spoken_text(), None);
        assert_eq!(Turn::assistant("ok").spoken_text(), Some("ok"));
    }

    #[test]
    fn speaker_maps_to_provider_role() {
        assert_eq!(Speaker::User.role(), ChatRole::User);
        assert_eq!(Speaker::Assistant.role(), ChatRole::Assistant);
    }

    #[test]
    fn turn_serializes_without_absent_fields() {
        let json = serde_json::to_value(Turn::user("Hi")).unwrap();
        assert_eq!(json["speaker"], "user");
        assert_eq!(json["direction"], "outgoing");
        assert!(json.get("audio_reference").is_none());
    }

    #[test]
    fn exchange_state_defaults_to_idle() {
        assert_eq!(ExchangeState::default(), ExchangeState::Idle);
        assert!(ExchangeState::AwaitingReply.is_awaiting());
    }
}
