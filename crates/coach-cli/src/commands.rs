//! Slash-command parsing for the REPL.

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text to send to the coach.
    Message(String),
    Scenario(String),
    Scenarios,
    New,
    Speech(bool),
    Transcript,
    Help,
    Quit,
    /// A slash command that could not be understood, with a hint.
    Invalid(String),
}

/// Classifies `line`. Anything not starting with `/` is a message.
pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Message(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (name, arg) {
        ("scenario", Some(scenario)) => Command::Scenario(scenario.to_string()),
        ("scenario", None) => Command::Invalid("usage: /scenario <name>".to_string()),
        ("scenarios", _) => Command::Scenarios,
        ("new", _) => Command::New,
        ("speech", Some("on")) => Command::Speech(true),
        ("speech", Some("off")) => Command::Speech(false),
        ("speech", _) => Command::Invalid("usage: /speech on|off".to_string()),
        ("transcript", _) => Command::Transcript,
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => Command::Invalid(format!(
            "unknown command /{}. Type /help for available commands.",
            other
        )),
    }
}

pub const HELP: &str = "\
Commands:
  /scenario <name>   pick who the coach plays
  /scenarios         list available scenarios
  /new               start a new chat
  /speech on|off     speak replies aloud
  /transcript        show the conversation so far
  /help              show this help
  /quit              leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(parse("Buy my pen"), Command::Message("Buy my pen".to_string()));
        assert_eq!(parse(""), Command::Message(String::new()));
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse("/scenario sellAPen"),
            Command::Scenario("sellAPen".to_string())
        );
        assert_eq!(parse("  /speech on "), Command::Speech(true));
        assert_eq!(parse("/speech off"), Command::Speech(false));
        assert_eq!(parse("/new"), Command::New);
        assert_eq!(parse("/exit"), Command::Quit);
    }

    #[test]
    fn bad_commands_carry_a_hint() {
        assert!(matches!(parse("/scenario"), Command::Invalid(msg) if msg.contains("usage")));
        assert!(matches!(parse("/speech loud"), Command::Invalid(msg) if msg.contains("on|off")));
        assert!(matches!(parse("/dance"), Command::Invalid(msg) if msg.contains("/dance")));
    }
}
