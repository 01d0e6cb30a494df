//! Per-conversation state.
//!
//! Everything a conversation owns lives in [`ChatSession`]: the transcript,
//! the persona selection, the exchange flag, and the last error notice.
//! Operations take the session explicitly instead of reaching for shared
//! state, so a test can drive a whole conversation without a UI.

use crate::error::ChatError;
use crate::persona::{PersonaSelection, ScenarioCatalog};
use crate::transcript::{Transcript, DEFAULT_GREETING};
use coach_types::{ExchangeState, Turn};
use std::fmt;
use std::sync::Arc;

/// A recoverable problem from the last exchange, for the UI to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeNotice {
    message: String,
}

impl ExchangeNotice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExchangeNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Transcript,
    catalog: Arc<ScenarioCatalog>,
    selection: PersonaSelection,
    state: ExchangeState,
    notice: Option<ExchangeNotice>,
    speech_enabled: bool,
}

impl ChatSession {
    pub fn new(greeting: impl Into<String>, catalog: Arc<ScenarioCatalog>) -> Self {
        Self {
            transcript: Transcript::new(greeting),
            catalog,
            selection: PersonaSelection::default(),
            state: ExchangeState::Idle,
            notice: None,
            speech_enabled: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// The system directive sent with the next request.
    pub fn persona(&self) -> &str {
        self.selection.persona()
    }

    pub fn active_scenario(&self) -> Option<&str> {
        self.selection.active()
    }

    pub fn exchange_state(&self) -> ExchangeState {
        self.state
    }

    /// Whether the "coach is typing" indicator should show.
    pub fn is_typing(&self) -> bool {
        self.state.is_awaiting()
    }

    pub fn notice(&self) -> Option<&ExchangeNotice> {
        self.notice.as_ref()
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech_enabled
    }

    pub fn set_speech_enabled(&mut self, enabled: bool) {
        self.speech_enabled = enabled;
    }

    /// Makes the scenario called `name` the active persona.
    ///
    /// Replaces any previous selection; never touches the transcript.
    pub fn select_persona(&mut self, name: &str) -> Result<(), ChatError> {
        self.selection.select(&self.catalog, name)?;
        tracing::info!(scenario = name, "selected scenario");
        Ok(())
    }

    /// Starts over: a fresh greeting-only transcript, no persona, no notice.
    pub fn new_chat(&mut self) {
        self.transcript.reset();
        self.selection.clear();
        self.notice = None;
        tracing::info!("started new chat");
    }

    pub(crate) fn append(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }

    pub(crate) fn set_state(&mut self, state: ExchangeState) {
        self.state = state;
    }

    pub(crate) fn record_notice(&mut self, notice: ExchangeNotice) {
        self.notice = Some(notice);
    }

    pub(crate) fn clear_notice(&mut self) {
        self.notice = None;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING, Arc::new(ScenarioCatalog::builtin()))
    }
}
