//! Fire-and-forget audio playback.
//!
//! `play` returns as soon as playback has been handed off. Anything that goes
//! wrong after the hand-off is logged by the playback task and never reaches
//! the caller.

use crate::error::VoiceError;
use coach_types::AudioReference;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub trait AudioPlayer: Send + Sync {
    /// Starts playing `audio` without waiting for it to finish.
    fn play(&self, audio: &AudioReference) -> Result<(), VoiceError>;
}

/// Discards audio. Used when no playback command is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlayer;

impl AudioPlayer for NoopPlayer {
    fn play(&self, _audio: &AudioReference) -> Result<(), VoiceError> {
        Ok(())
    }
}

/// Plays audio by piping the decoded bytes into an external decoder, such as
/// `mpg123 -q -` or `ffplay -nodisp -autoexit -`.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parses a whitespace-separated command line. Returns `None` for a
    /// blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&self, audio: &AudioReference) -> Result<(), VoiceError> {
        let bytes = audio.decode()?;
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| VoiceError::Playback(format!("no async runtime available: {}", e)))?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(false);
        let program = self.program.clone();

        handle.spawn(async move {
            let mut child = match command.spawn() {
                Ok(child) => child,
                Err(e) => {
                    tracing::warn!(program = %program, "failed to spawn audio player: {}", e);
                    return;
                }
            };

            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(&bytes).await {
                    tracing::warn!(program = %program, "failed to write audio to player: {}", e);
                }
                // Close stdin to signal EOF
                drop(stdin);
            }

            match child.wait_with_output().await {
                Ok(output) if output.status.success() => {
                    tracing::debug!(program = %program, bytes = bytes.len(), "playback finished");
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    tracing::warn!(program = %program, status = %output.status, "audio player failed: {}", stderr);
                }
                Err(e) => {
                    tracing::warn!(program = %program, "failed to wait for audio player: {}", e);
                }
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_is_split_on_whitespace() {
        let player = CommandPlayer::from_command_line("mpg123  -q -").unwrap();
        assert_eq!(player.program(), "mpg123");
        assert_eq!(player.args(), ["-q".to_string(), "-".to_string()]);
        assert!(CommandPlayer::from_command_line("   ").is_none());
    }

    #[test]
    fn noop_player_accepts_anything() {
        let audio = AudioReference::from_mp3_bytes(&[1, 2, 3]);
        assert!(NoopPlayer.play(&audio).is_ok());
    }

    #[test]
    fn command_player_needs_a_runtime() {
        let player = CommandPlayer::new("cat", vec![]);
        let audio = AudioReference::from_mp3_bytes(&[1, 2, 3]);
        assert!(matches!(player.play(&audio), Err(VoiceError::Playback(_))));
    }

    #[tokio::test]
    async fn command_player_rejects_undecodable_reference() {
        let player = CommandPlayer::new("cat", vec![]);
        let audio: AudioReference = serde_json::from_str("\"blob:abc\"").unwrap();
        assert!(matches!(player.play(&audio), Err(VoiceError::Audio(_))));
    }

    #[tokio::test]
    async fn missing_player_binary_does_not_fail_the_caller() {
        let player = CommandPlayer::new("definitely-not-an-audio-player-binary", vec![]);
        let audio = AudioReference::from_mp3_bytes(&[1, 2, 3]);
        assert!(player.play(&audio).is_ok());
    }
}
