//! One request/response round trip against the completion endpoint.
//!
//! [`ExchangeCoordinator::send`] runs the whole exchange. Callers that must
//! not hold the session across the network await (a UI event loop, a shared
//! session behind a lock) can use the three phases directly:
//!
//! 1. [`begin`](ExchangeCoordinator::begin) appends the user turn, marks the
//!    session as awaiting, and snapshots the request.
//! 2. [`exchange`](ExchangeCoordinator::exchange) does the network work and
//!    touches no session state.
//! 3. [`finish`](ExchangeCoordinator::finish) appends the reply (or records
//!    a notice) and returns the session to idle.
//!
//! While a session is awaiting, `begin` refuses a second exchange.

use crate::capture::{resolve_outgoing_text, SpeechCapture};
use crate::completion::CompletionProvider;
use crate::error::{ChatError, CompletionError};
use crate::request::RequestBuilder;
use crate::session::{ChatSession, ExchangeNotice};
use coach_types::{AudioReference, CompletionRequest, ExchangeState, Turn};
use coach_voice::{AudioPlayer, NoopPlayer, SpeechSynthesizer};
use std::sync::Arc;

/// A started exchange waiting for its network phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    request: CompletionRequest,
    speak: bool,
}

impl PendingExchange {
    pub fn request(&self) -> &CompletionRequest {
        &self.request
    }

    /// Whether the reply will be synthesized.
    pub fn speaks(&self) -> bool {
        self.speak
    }
}

/// What the network phase produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeReply {
    pub text: String,
    pub audio: Option<AudioReference>,
}

/// Result of [`ExchangeCoordinator::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// There was no text to send. Nothing changed.
    Ignored,
    /// The reply was appended, with audio when speech produced some.
    Replied {
        reply: String,
        audio: Option<AudioReference>,
    },
}

/// Restores [`ExchangeState::Idle`] when dropped, so the typing indicator
/// clears on success, on error, and when the `send` future is dropped.
struct AwaitingGuard<'a>(&'a mut ChatSession);

impl Drop for AwaitingGuard<'_> {
    fn drop(&mut self) {
        self.0.set_state(ExchangeState::Idle);
    }
}

pub struct ExchangeCoordinator {
    builder: RequestBuilder,
    completion: Arc<dyn CompletionProvider>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    player: Arc<dyn AudioPlayer>,
}

impl ExchangeCoordinator {
    pub fn new(builder: RequestBuilder, completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            builder,
            completion,
            speech: None,
            player: Arc::new(NoopPlayer),
        }
    }

    /// Speaks replies through `synthesizer` when the session has speech on.
    pub fn with_speech(mut self, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        self.speech = Some(synthesizer);
        self
    }

    pub fn with_player(mut self, player: Arc<dyn AudioPlayer>) -> Self {
        self.player = player;
        self
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Sends one user message and reconciles the reply into `session`.
    ///
    /// Typed text takes precedence over the speech capture. Blank input is
    /// ignored without touching the session.
    ///
    /// # Errors
    ///
    /// - [`ChatError::ExchangeInFlight`] if the session is already awaiting
    ///   a reply; nothing is appended.
    /// - [`ChatError::Completion`] if the provider call fails; the user turn
    ///   stays, no reply is appended, and a notice is recorded.
    pub async fn send(
        &self,
        session: &mut ChatSession,
        typed: &str,
        capture: Option<&SpeechCapture>,
    ) -> Result<SendOutcome, ChatError> {
        let Some(pending) = self.begin(session, typed, capture)? else {
            return Ok(SendOutcome::Ignored);
        };

        let result = {
            let _guard = AwaitingGuard(&mut *session);
            self.exchange(&pending).await
        };

        self.finish(session, result)
    }

    /// Appends the user turn and marks the session as awaiting.
    ///
    /// Returns `Ok(None)` when there is nothing to send.
    pub fn begin(
        &self,
        session: &mut ChatSession,
        typed: &str,
        capture: Option<&SpeechCapture>,
    ) -> Result<Option<PendingExchange>, ChatError> {
        let Some(text) = resolve_outgoing_text(typed, capture) else {
            tracing::debug!("ignoring empty message");
            return Ok(None);
        };
        if session.exchange_state().is_awaiting() {
            return Err(ChatError::ExchangeInFlight);
        }

        session.append(Turn::user(text));
        session.set_state(ExchangeState::AwaitingReply);

        let request = self.builder.build(session.transcript(), session.persona());
        Ok(Some(PendingExchange {
            request,
            speak: session.speech_enabled() && self.speech.is_some(),
        }))
    }

    /// Calls the provider and, if requested, synthesizes and starts playing
    /// the reply.
    ///
    /// Synthesis and playback failures are logged and dropped: the text
    /// reply is returned either way.
    pub async fn exchange(&self, pending: &PendingExchange) -> Result<ExchangeReply, ChatError> {
        let response = self.completion.complete(&pending.request).await?;
        let text = response
            .reply_text()
            .ok_or_else(|| CompletionError::Malformed("response has no choices".to_string()))?
            .to_string();

        let audio = if pending.speak {
            self.speak(&text).await
        } else {
            None
        };

        Ok(ExchangeReply { text, audio })
    }

    /// Folds the network result back into `session` and clears the
    /// awaiting flag.
    pub fn finish(
        &self,
        session: &mut ChatSession,
        result: Result<ExchangeReply, ChatError>,
    ) -> Result<SendOutcome, ChatError> {
        session.set_state(ExchangeState::Idle);

        match result {
            Ok(reply) => {
                session.append(Turn::assistant(reply.text.clone()));
                if let Some(audio) = &reply.audio {
                    session.append(Turn::assistant_audio(audio.clone()));
                }
                session.clear_notice();
                tracing::info!(
                    turns = session.transcript().len(),
                    audio = reply.audio.is_some(),
                    "exchange completed"
                );
                Ok(SendOutcome::Replied {
                    reply: reply.text,
                    audio: reply.audio,
                })
            }
            Err(e) => {
                tracing::warn!("exchange failed: {}", e);
                session.record_notice(ExchangeNotice::new(format!(
                    "The coach could not reply: {}",
                    e
                )));
                Err(e)
            }
        }
    }

    async fn speak(&self, text: &str) -> Option<AudioReference> {
        let synthesizer = self.speech.as_ref()?;
        let bytes = match synthesizer.synthesize(text).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("speech synthesis failed, continuing with text only: {}", e);
                return None;
            }
        };

        let audio = AudioReference::from_mp3_bytes(&bytes);
        if let Err(e) = self.player.play(&audio) {
            tracing::warn!("audio playback failed: {}", e);
        }
        Some(audio)
    }
}
