//! Speech infrastructure for Sales Coach.
//!
//! Two sides share this crate. The server side, [`CloudTtsService`], turns
//! text into MP3 bytes by calling a cloud text-to-speech API with
//! credentials that never leave the server. The client side,
//! [`SpeechProxyClient`], asks that server for audio on behalf of a chat
//! session. Both implement [`SpeechSynthesizer`], so a chat session or the
//! proxy route can be handed either one (or a test stub).
//!
//! Synthesis and playback are deliberately separate steps: a synthesizer
//! returns bytes, and an [`AudioPlayer`] plays an [`AudioReference`] built
//! from them without being awaited.

pub mod config;
pub mod error;
pub mod playback;
pub mod proxy;
pub mod synth;
pub mod tts;

pub use coach_types::AudioReference;
pub use config::{CloudTtsConfig, SpeechProxyConfig, DEFAULT_TTS_ENDPOINT};
pub use error::VoiceError;
pub use playback::{AudioPlayer, CommandPlayer, NoopPlayer};
pub use proxy::SpeechProxyClient;
pub use synth::SpeechSynthesizer;
pub use tts::{CloudTtsService, MAX_TTS_INPUT_BYTES};
