//! Terminal client configuration loading from file and environment variables.

use coach_chat::{CompletionConfig, Scenario, DEFAULT_GREETING};
use coach_voice::SpeechProxyConfig;
use serde::Deserialize;
use thiserror::Error;

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Completion endpoint settings.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Whether and where replies are spoken.
    #[serde(default)]
    pub speech: SpeechProxyConfig,

    /// How synthesized audio is played.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Conversation settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scenarios added to (or replacing) the built-in catalog.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

/// Audio playback settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaybackConfig {
    /// Command that reads MP3 from stdin, e.g. `mpg123 -q -`. Unset means
    /// replies are synthesized but not played.
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// First assistant turn of every conversation.
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "warn", "coach_chat=debug,warn").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
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
/// - `COACH_COMPLETION_API_KEY` overrides `completion.api_key`;
///   `OPENAI_API_KEY` is used when neither is set
/// - `COACH_MODEL` overrides `completion.model`
/// - `COACH_SPEECH_PROXY_URL` overrides `speech.proxy_url`
/// - `COACH_SPEECH_ENABLED` overrides `speech.enabled` ("true" or "1")
/// - `COACH_LOG_LEVEL` overrides `logging.level`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
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
    if let Some(key) = lookup("COACH_COMPLETION_API_KEY").filter(|k| !k.is_empty()) {
        config.completion.api_key = key;
    } else if config.completion.api_key.is_empty() {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            config.completion.api_key = key;
        }
    }
    if let Some(model) = lookup("COACH_MODEL").filter(|m| !m.is_empty()) {
        config.completion.model = model;
    }
    if let Some(url) = lookup("COACH_SPEECH_PROXY_URL").filter(|u| !u.is_empty()) {
        config.speech.proxy_url = url;
    }
    if let Some(enabled) = lookup("COACH_SPEECH_ENABLED") {
        config.speech.enabled = enabled == "true" || enabled == "1";
    }
    if let Some(level) = lookup("COACH_LOG_LEVEL") {
        config.logging.level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_chat::DEFAULT_MODEL;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_file() {
        let mut config: Config = toml::from_str("").unwrap();
        apply_env_overrides(&mut config, env(&[]));

        assert_eq!(config.completion.model, DEFAULT_MODEL);
        assert!(!config.speech.enabled);
        assert_eq!(config.speech.proxy_url, "http://127.0.0.1:5000/api");
        assert!(config.playback.command.is_none());
        assert_eq!(config.session.greeting, DEFAULT_GREETING);
        assert_eq!(config.logging.level, "warn");
        assert!(config.scenarios.is_empty());
    }

    #[test]
    fn reads_file_with_scenarios() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[completion]
model = "gpt-4o-mini"
api_key = "sk-file"

[speech]
enabled = true

[playback]
command = "mpg123 -q -"

[session]
greeting = "Ready when you are."

[[scenarios]]
name = "renewal"
label = "Renewal call"
persona = "You are a customer whose contract is up for renewal."
"#
        )
        .unwrap();

        let config = load_config(Some(file.path().to_str().unwrap())).unwrap();

        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert!(config.speech.enabled);
        assert_eq!(config.playback.command.as_deref(), Some("mpg123 -q -"));
        assert_eq!(config.session.greeting, "Ready when you are.");
        assert_eq!(config.scenarios.len(), 1);
        assert_eq!(config.scenarios[0].name, "renewal");
        assert_eq!(config.scenarios[0].label, "Renewal call");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[scenarios]]\nname = ").unwrap();
        let result = load_config(Some(file.path().to_str().unwrap()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        config.completion.api_key = "sk-file".to_string();
        apply_env_overrides(
            &mut config,
            env(&[
                ("COACH_COMPLETION_API_KEY", "sk-env"),
                ("COACH_MODEL", "gpt-4o"),
                ("COACH_SPEECH_PROXY_URL", "http://speech.local/api"),
                ("COACH_SPEECH_ENABLED", "true"),
                ("COACH_LOG_LEVEL", "debug"),
            ]),
        );

        assert_eq!(config.completion.api_key, "sk-env");
        assert_eq!(config.completion.model, "gpt-4o");
        assert_eq!(config.speech.proxy_url, "http://speech.local/api");
        assert!(config.speech.enabled);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn openai_key_is_a_fallback_only() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, env(&[("OPENAI_API_KEY", "sk-openai")]));
        assert_eq!(config.completion.api_key, "sk-openai");

        let mut config = Config::default();
        config.completion.api_key = "sk-file".to_string();
        apply_env_overrides(&mut config, env(&[("OPENAI_API_KEY", "sk-openai")]));
        assert_eq!(config.completion.api_key, "sk-file");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let mut config = Config::default();
        config.completion.api_key = "sk-secret".to_string();
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }
}
