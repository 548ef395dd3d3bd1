use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::repeat::{RepeatMode, RepeatState};
use crate::session::unit_list::TypingMode;

pub const MAX_REPEAT_TARGET: u32 = 99;
pub const MAX_ADVANCE_DELAY_MS: u64 = 5000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub repeat_mode: RepeatMode,
    #[serde(default = "default_repeat_target")]
    pub word_repeat_target: u32,
    #[serde(default = "default_repeat_target")]
    pub list_repeat_target: u32,
    #[serde(default)]
    pub dictation_mode: bool,
    #[serde(default)]
    pub typing_mode: TypingMode,
    /// Pause between finishing a unit and moving on.
    #[serde(default = "default_advance_delay_ms")]
    pub advance_delay_ms: u64,
    #[serde(default = "default_true")]
    pub auto_pronounce_before: bool,
    #[serde(default = "default_true")]
    pub auto_pronounce_after: bool,
    /// External text-to-speech program, e.g. `espeak`. The unit text is
    /// passed as the last argument.
    #[serde(default)]
    pub speech_command: Option<String>,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_repeat_target() -> u32 {
    3
}
fn default_advance_delay_ms() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            repeat_mode: RepeatMode::default(),
            word_repeat_target: default_repeat_target(),
            list_repeat_target: default_repeat_target(),
            dictation_mode: false,
            typing_mode: TypingMode::default(),
            advance_delay_ms: default_advance_delay_ms(),
            auto_pronounce_before: default_true(),
            auto_pronounce_after: default_true(),
            speech_command: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocadrill")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn normalize(&mut self) {
        self.word_repeat_target = self.word_repeat_target.clamp(1, MAX_REPEAT_TARGET);
        self.list_repeat_target = self.list_repeat_target.clamp(1, MAX_REPEAT_TARGET);
        self.advance_delay_ms = self.advance_delay_ms.min(MAX_ADVANCE_DELAY_MS);
        if self
            .speech_command
            .as_deref()
            .is_some_and(|cmd| cmd.trim().is_empty())
        {
            self.speech_command = None;
        }
    }

    pub fn repeat_state(&self) -> RepeatState {
        RepeatState::new(
            self.repeat_mode,
            self.word_repeat_target,
            self.list_repeat_target,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.repeat_mode, RepeatMode::None);
        assert_eq!(config.word_repeat_target, 3);
        assert_eq!(config.advance_delay_ms, 1000);
        assert!(config.auto_pronounce_before);
        assert!(config.speech_command.is_none());
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
theme = "catppuccin-mocha"
repeat_mode = "list"
list_repeat_target = 2
typing_mode = "base-form"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.repeat_mode, RepeatMode::List);
        assert_eq!(config.typing_mode, TypingMode::BaseForm);
        let state = config.repeat_state();
        assert_eq!(state.list_repeat_target, 2);
        assert_eq!(state.list_round, 1);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.repeat_mode = RepeatMode::Word;
        config.dictation_mode = true;
        config.speech_command = Some("espeak".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.repeat_mode, RepeatMode::Word);
        assert!(loaded.dictation_mode);
        assert_eq!(loaded.speech_command.as_deref(), Some("espeak"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config.theme, "terminal-default");
    }

    #[test]
    fn test_normalize_clamps_out_of_range() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "word_repeat_target = 0\nlist_repeat_target = 1000\nadvance_delay_ms = 60000\nspeech_command = \" \"\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.word_repeat_target, 1);
        assert_eq!(config.list_repeat_target, MAX_REPEAT_TARGET);
        assert_eq!(config.advance_delay_ms, MAX_ADVANCE_DELAY_MS);
        assert!(config.speech_command.is_none());
    }
}
