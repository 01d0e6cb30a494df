//! Sales Coach speech proxy.
//!
//! Keeps the text-to-speech credentials on the server: browsers and the
//! terminal client post reply text to `POST /api` and get MP3 bytes back.

pub mod api;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use coach_voice::SpeechSynthesizer;
use config::ServerConfig;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Largest accepted request body. Reply text is far below this.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Turns reply text into MP3 bytes.
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl AppState {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { synthesizer }
    }
}

/// Health check handler.
///
/// Returns `200 OK` with server status and version.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router.
///
/// The browser client is served from `config.client_dir` when that
/// directory holds an `index.html`.
pub fn app(state: AppState, config: &ServerConfig) -> Router {
    app_with_client_dir(state, &config.client_dir)
}

/// Same as [`app`] with an explicit client directory.
pub fn app_with_client_dir(state: AppState, client_dir: impl AsRef<Path>) -> Router {
    let client_dir = client_dir.as_ref();
    let router = Router::new()
        .route("/", get(api::index_handler))
        .route("/health", get(health))
        .route("/api", post(api::speech_handler));

    let index = client_dir.join("index.html");
    let router = if index.exists() {
        tracing::info!(path = %client_dir.display(), "serving client static files");
        router.fallback_service(ServeDir::new(client_dir).fallback(ServeFile::new(index)))
    } else {
        tracing::info!(path = %client_dir.display(), "client directory not found, skipping static file serving");
        router
    };

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
