//! Terminal front end for the sales coach.
//!
//! Reads lines from stdin, sends them through the exchange coordinator, and
//! optionally speaks replies via the speech proxy.

mod commands;
mod config;
mod repl;

use coach_chat::{
    ChatSession, ExchangeCoordinator, OpenAiCompletionClient, RequestBuilder, ScenarioCatalog,
};
use coach_voice::{CommandPlayer, SpeechProxyClient};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("COACH_CLI_CONFIG") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("coach.toml"));

    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration: check the coach config file");

    // Logs go to stderr so they do not interleave with the conversation.
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("warn"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::debug!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    if config.completion.api_key.is_empty() {
        tracing::warn!(
            "no completion API key configured (set COACH_COMPLETION_API_KEY); messages will fail"
        );
    }

    let mut catalog = ScenarioCatalog::builtin();
    for scenario in config.scenarios.iter().cloned() {
        catalog.insert(scenario);
    }

    let mut session = ChatSession::new(config.session.greeting.clone(), Arc::new(catalog));
    session.set_speech_enabled(config.speech.enabled);

    let client = OpenAiCompletionClient::new(&config.completion)
        .expect("failed to build the completion client");
    let proxy =
        SpeechProxyClient::from_config(&config.speech).expect("failed to build the speech client");

    let mut coordinator = ExchangeCoordinator::new(
        RequestBuilder::new(config.completion.model.clone()),
        Arc::new(client),
    )
    .with_speech(Arc::new(proxy));

    match config
        .playback
        .command
        .as_deref()
        .and_then(CommandPlayer::from_command_line)
    {
        Some(player) => {
            tracing::debug!(program = player.program(), "audio playback enabled");
            coordinator = coordinator.with_player(Arc::new(player));
        }
        None => tracing::debug!("no playback command configured, spoken replies stay silent"),
    }

    let mut repl = repl::Repl::new(coordinator, session, std::io::stdout());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());

    let result = match repl.print_banner() {
        Ok(()) => repl::run(&mut repl, stdin).await,
        Err(e) => Err(e),
    };
    tracing::debug!(
        turns = repl.session().transcript().len(),
        "session ended"
    );
    if let Err(e) = result {
        eprintln!("coach: {}", e);
        std::process::exit(1);
    }
}
