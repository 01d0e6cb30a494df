//! API handlers for the speech proxy.

use crate::AppState;
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coach_types::{AudioBuffer, SpeechRequest, SpeechResponse};
use coach_voice::VoiceError;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("speech synthesis is not configured: {0}")]
    ServiceUnavailable(String),
    #[error("speech provider failed: {0}")]
    BadGateway(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<VoiceError> for ApiError {
    fn from(e: VoiceError) -> Self {
        match e {
            VoiceError::InvalidInput(msg) => ApiError::BadRequest(msg),
            VoiceError::Config(msg) => ApiError::ServiceUnavailable(msg),
            VoiceError::Tts(_) | VoiceError::Proxy(_) | VoiceError::Http(_) => {
                ApiError::BadGateway(e.to_string())
            }
            VoiceError::Audio(_) | VoiceError::Playback(_) => {
                ApiError::InternalServerError(e.to_string())
            }
        }
    }
}

/// Handler for `GET /`.
pub async fn index_handler() -> Json<Value> {
    Json(json!({ "title": "Sales Coach" }))
}

/// Handler for `POST /api`.
///
/// Synthesizes `text` and returns the MP3 bytes in buffer form.
pub async fn speech_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SpeechRequest>,
) -> Result<Json<SpeechResponse>, ApiError> {
    let audio = state
        .synthesizer
        .synthesize(&payload.text)
        .await
        .map_err(|e| {
            tracing::warn!("speech request failed: {}", e);
            ApiError::from(e)
        })?;

    tracing::info!(
        chars = payload.text.chars().count(),
        bytes = audio.len(),
        "audio synthesized"
    );

    Ok(Json(SpeechResponse {
        message: "audio synthesized".to_string(),
        body: AudioBuffer::new(audio),
    }))
}
