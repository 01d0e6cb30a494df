//! Error types for the conversation core.

/// Failures talking to the completion endpoint.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// No API key was configured.
    #[error("completion API key is not configured")]
    MissingApiKey,

    /// The request never produced an HTTP response.
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The body could not be read as a completion response.
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// Errors surfaced by session and coordinator operations.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The scenario name is not in the catalog.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// A reply is still pending for this session.
    #[error("an exchange is already in flight")]
    ExchangeInFlight,

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
