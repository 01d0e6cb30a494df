//! Server configuration loading from file and environment variables.

use coach_voice::CloudTtsConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Text-to-speech provider settings.
    #[serde(default)]
    pub speech: CloudTtsConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built browser client. Served only when it
    /// contains an `index.html`.
    #[serde(default = "default_client_dir")]
    pub client_dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "coach_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    5000
}

fn default_client_dir() -> PathBuf {
    PathBuf::from("client/dist")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            client_dir: default_client_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `COACH_HOST` overrides `server.host`
/// - `COACH_PORT` overrides `server.port`
/// - `COACH_CLIENT_DIR` overrides `server.client_dir`
/// - `COACH_LOG_LEVEL` overrides `logging.level`
/// - `COACH_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `COACH_TTS_API_KEY` overrides `speech.api_key`; `GOOGLE_API_KEY` is
///   used when neither is set
/// - `COACH_TTS_OUTPUT_PATH` overrides `speech.output_path`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Applies overrides from `lookup`, which stands in for the process
/// environment.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(host) = lookup("COACH_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("COACH_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(dir) = lookup("COACH_CLIENT_DIR").filter(|d| !d.is_empty()) {
        config.server.client_dir = PathBuf::from(dir);
    }
    if let Some(level) = lookup("COACH_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("COACH_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(key) = lookup("COACH_TTS_API_KEY").filter(|k| !k.is_empty()) {
        config.speech.api_key = key;
    } else if config.speech.api_key.is_empty() {
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            config.speech.api_key = key;
        }
    }
    if let Some(path) = lookup("COACH_TTS_OUTPUT_PATH").filter(|p| !p.is_empty()) {
        config.speech.output_path = Some(PathBuf::from(path));
    }
}
