use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result, bail};

/// Pronounces practice text. Failures are reported, never fatal to a session.
pub trait Speaker {
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Runs an external text-to-speech program, e.g. `espeak` or `say`, with the
/// text as its last argument. A new utterance cuts off the previous one.
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
    current: Option<Child>,
}

impl CommandSpeaker {
    /// Split a command line like `espeak -s 140` into program and arguments.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            bail!("empty speech command");
        };
        Ok(Self {
            program,
            args: parts.collect(),
            current: None,
        })
    }

    fn stop_current(&mut self) {
        if let Some(mut child) = self.current.take() {
            if matches!(child.try_wait(), Ok(None)) {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        self.stop_current();
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to run speech command `{}`", self.program))?;
        self.current = Some(child);
        Ok(())
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.stop_current();
    }
}

/// Used when no speech command is configured.
#[derive(Debug, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        tracing::debug!(text, "speech disabled");
        Ok(())
    }
}

pub fn speaker_for(command: Option<&str>) -> Box<dyn Speaker> {
    match command.map(CommandSpeaker::from_command_line) {
        Some(Ok(speaker)) => Box::new(speaker),
        Some(Err(err)) => {
            tracing::warn!(%err, "speech disabled");
            Box::new(SilentSpeaker)
        }
        None => Box::new(SilentSpeaker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_is_split() {
        let speaker = CommandSpeaker::from_command_line("espeak -s 140").unwrap();
        assert_eq!(speaker.program, "espeak");
        assert_eq!(speaker.args, vec!["-s", "140"]);
        assert!(CommandSpeaker::from_command_line("   ").is_err());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let mut speaker =
            CommandSpeaker::from_command_line("vocadrill-no-such-speech-program").unwrap();
        assert!(speaker.speak("hello").is_err());
    }

    #[test]
    fn test_silent_speaker_accepts_everything() {
        let mut speaker = SilentSpeaker;
        assert!(speaker.speak("apple").is_ok());
        assert!(speaker.speak("").is_ok());
    }

    #[test]
    fn test_bad_command_falls_back_to_silent() {
        let mut speaker = speaker_for(Some("   "));
        assert!(speaker.speak("apple").is_ok());
    }
}
