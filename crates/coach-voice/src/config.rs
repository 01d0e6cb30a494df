use coach_types::voice::VoiceSelection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// REST endpoint of the cloud text-to-speech API.
pub const DEFAULT_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

fn default_tts_endpoint() -> String {
    DEFAULT_TTS_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_proxy_url() -> String {
    "http://127.0.0.1:5000/api".to_string()
}

/// Settings for the server-side synthesis client.
#[derive(Clone, Serialize, Deserialize)]
pub struct CloudTtsConfig {
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default)]
    pub voice: VoiceSelection,
    /// When set, every synthesized clip is also written to this file.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// Request timeout in seconds. Default: 30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CloudTtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            api_key: String::new(),
            voice: VoiceSelection::default(),
            output_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl fmt::Debug for CloudTtsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudTtsConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("voice", &self.voice)
            .field("output_path", &self.output_path)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CloudTtsConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

/// Settings for reaching the speech proxy from a chat client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechProxyConfig {
    /// Whether replies are spoken at all.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            proxy_url: default_proxy_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
