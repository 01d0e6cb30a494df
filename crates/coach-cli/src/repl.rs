//! Line-oriented chat loop.

use crate::commands::{self, Command, HELP};
use coach_chat::{ChatSession, ExchangeCoordinator, SendOutcome};
use coach_types::Speaker;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Repl<W> {
    coordinator: ExchangeCoordinator,
    session: ChatSession,
    out: W,
}

impl<W: Write> Repl<W> {
    pub fn new(coordinator: ExchangeCoordinator, session: ChatSession, out: W) -> Self {
        Self {
            coordinator,
            session,
            out,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Prints the greeting and a one-line hint.
    pub fn print_banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "coach: {}", self.session.transcript().greeting())?;
        writeln!(self.out, "(type /help for commands)")?;
        Ok(())
    }

    pub async fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match commands::parse(line) {
            Command::Message(text) => self.send(&text).await?,
            Command::Scenario(name) => match self.session.select_persona(&name) {
                Ok(()) => writeln!(self.out, "scenario: {}", name)?,
                Err(e) => writeln!(self.out, "! {}", e)?,
            },
            Command::Scenarios => self.list_scenarios()?,
            Command::New => {
                self.session.new_chat();
                writeln!(self.out, "coach: {}", self.session.transcript().greeting())?;
            }
            Command::Speech(enabled) => {
                self.session.set_speech_enabled(enabled);
                writeln!(self.out, "speech {}", if enabled { "on" } else { "off" })?;
            }
            Command::Transcript => self.print_transcript()?,
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Invalid(hint) => writeln!(self.out, "! {}", hint)?,
        }
        Ok(Flow::Continue)
    }

    async fn send(&mut self, text: &str) -> io::Result<()> {
        let pending = match self.coordinator.begin(&mut self.session, text, None) {
            Ok(Some(pending)) => pending,
            Ok(None) => return Ok(()),
            Err(e) => {
                writeln!(self.out, "! {}", e)?;
                return Ok(());
            }
        };

        // The session is awaiting now; output errors wait until `finish`
        // has returned it to idle.
        let indicator = if self.session.is_typing() {
            writeln!(self.out, "coach is typing...").and_then(|()| self.out.flush())
        } else {
            Ok(())
        };

        let result = self.coordinator.exchange(&pending).await;
        let outcome = self.coordinator.finish(&mut self.session, result);
        indicator?;

        match outcome {
            Ok(SendOutcome::Replied { reply, audio }) => {
                writeln!(self.out, "coach: {}", reply)?;
                if audio.is_some() {
                    writeln!(self.out, "(spoken)")?;
                }
            }
            Ok(SendOutcome::Ignored) => {}
            Err(_) => {
                if let Some(notice) = self.session.notice() {
                    writeln!(self.out, "! {}", notice)?;
                }
            }
        }
        Ok(())
    }

    fn list_scenarios(&mut self) -> io::Result<()> {
        let active = self.session.active_scenario();
        for scenario in self.session.catalog().iter() {
            let marker = if active == Some(scenario.name.as_str()) {
                '*'
            } else {
                ' '
            };
            let label = if scenario.label.is_empty() {
                &scenario.name
            } else {
                &scenario.label
            };
            writeln!(self.out, "{} {:<20} {}", marker, scenario.name, label)?;
        }
        Ok(())
    }

    fn print_transcript(&mut self) -> io::Result<()> {
        for turn in self.session.transcript() {
            let who = match turn.speaker() {
                Speaker::User => "you",
                Speaker::Assistant => "coach",
            };
            match (turn.text(), turn.audio_reference()) {
                (Some(text), _) => writeln!(self.out, "{}: {}", who, text)?,
                (None, Some(_)) => writeln!(self.out, "{}: [audio]", who)?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}

/// Reads lines from `input` until EOF or `/quit`.
pub async fn run<R, W>(repl: &mut Repl<W>, input: R) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        write!(repl.out, "you> ")?;
        repl.out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(repl.out)?;
            break;
        };
        if repl.handle_line(&line).await? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
