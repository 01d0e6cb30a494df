use crate::config::SpeechProxyConfig;
use crate::error::VoiceError;
use crate::synth::SpeechSynthesizer;
use async_trait::async_trait;
use coach_types::{SpeechRequest, SpeechResponse};
use std::time::Duration;

/// Client for the same-origin speech proxy (`POST /api`).
///
/// Sends `{text}` and unwraps the buffer-shaped audio from the reply. The
/// proxy holds the provider credentials, so this client needs none.
#[derive(Debug, Clone)]
pub struct SpeechProxyClient {
    url: String,
    client: reqwest::Client,
}

impl SpeechProxyClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, VoiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn from_config(config: &SpeechProxyConfig) -> Result<Self, VoiceError> {
        Self::new(
            config.proxy_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechProxyClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        if text.trim().is_empty() {
            return Err(VoiceError::InvalidInput("text is empty".to_string()));
        }

        let response = self
            .client
            .post(&self.url)
            .json(&SpeechRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or_default();
            return Err(VoiceError::Proxy(format!(
                "proxy returned {}: {}",
                status, message
            )));
        }

        let body: SpeechResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Proxy(format!("malformed proxy response: {}", e)))?;
        if body.body.data.is_empty() {
            return Err(VoiceError::Proxy("proxy returned no audio".to_string()));
        }

        tracing::debug!(bytes = body.body.data.len(), message = %body.message, "received proxied audio");
        Ok(body.body.data)
    }
}
