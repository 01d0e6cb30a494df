//! Conversation core for Sales Coach.
//!
//! Turns a locally held transcript into chat-completion requests and folds
//! the replies back in. The pieces, leaf first:
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`transcript`] | Append-only list of turns, seeded with a greeting |
//! | [`persona`] | Scenario catalog and the single active persona |
//! | [`request`] | Pure transcript + persona → provider request mapping |
//! | [`capture`] | Choosing between typed text and dictated text |
//! | [`completion`] | The provider seam and its HTTP implementation |
//! | [`session`] | All per-conversation state in one struct |
//! | [`coordinator`] | One round trip: append, request, speak, reconcile |
//!
//! # Usage
//!
//! ```rust,ignore
//! use coach_chat::{ChatSession, ExchangeCoordinator, OpenAiCompletionClient, RequestBuilder};
//!
//! let client = OpenAiCompletionClient::new(&config.completion)?;
//! let coordinator = ExchangeCoordinator::new(RequestBuilder::new(&config.completion.model), Arc::new(client));
//! let mut session = ChatSession::default();
//! session.select_persona("sellAPen")?;
//! coordinator.send(&mut session, "Hi", None).await?;
//! ```

pub mod capture;
pub mod completion;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod persona;
pub mod request;
pub mod session;
pub mod transcript;

pub use capture::{resolve_outgoing_text, SpeechCapture};
pub use completion::{CompletionProvider, OpenAiCompletionClient};
pub use config::{CompletionConfig, DEFAULT_COMPLETION_ENDPOINT, DEFAULT_MODEL};
pub use coordinator::{ExchangeCoordinator, ExchangeReply, PendingExchange, SendOutcome};
pub use error::{ChatError, CompletionError};
pub use persona::{PersonaSelection, Scenario, ScenarioCatalog};
pub use request::RequestBuilder;
pub use session::{ChatSession, ExchangeNotice};
pub use transcript::{Transcript, DEFAULT_GREETING};
