use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::repeat::RepeatMode;
use crate::session::drill::Drill;
use crate::session::unit_list::TypingMode;

/// Summary of one practice session, appended to the history file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionResult {
    pub timestamp: DateTime<Utc>,
    pub units: usize,
    pub completed: usize,
    pub skipped: usize,
    pub keystrokes: usize,
    pub wrong_keystrokes: usize,
    pub accuracy: f64,
    pub wpm: f64,
    pub elapsed_secs: f64,
    #[serde(default)]
    pub repeat_mode: RepeatMode,
    #[serde(default = "default_rounds")]
    pub list_rounds: u32,
    #[serde(default)]
    pub typing_mode: TypingMode,
    #[serde(default)]
    pub dictation: bool,
    /// Saved on quit before the session finished.
    #[serde(default)]
    pub partial: bool,
}

fn default_rounds() -> u32 {
    1
}

impl SessionResult {
    pub fn from_drill(drill: &Drill, typing_mode: TypingMode, partial: bool) -> Self {
        let stats = &drill.stats;
        let repeat = drill.repeat();
        Self {
            timestamp: Utc::now(),
            units: drill.progress().len(),
            completed: stats.units_completed,
            skipped: stats.units_skipped,
            keystrokes: stats.keystrokes,
            wrong_keystrokes: stats.wrong_keystrokes,
            accuracy: stats.accuracy(),
            wpm: stats.wpm(),
            elapsed_secs: stats.elapsed_secs(),
            repeat_mode: repeat.mode,
            list_rounds: repeat.list_round,
            typing_mode,
            dictation: drill.dictation(),
            partial,
        }
    }

    /// Sessions without a single keystroke are not worth recording.
    pub fn is_empty(&self) -> bool {
        self.keystrokes == 0 && self.skipped == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::repeat::RepeatState;
    use crate::engine::unit::units_from_texts;

    #[test]
    fn test_from_drill_counts() {
        let mut drill = Drill::new(
            units_from_texts(&["ab", "cd"]),
            RepeatState::new(RepeatMode::List, 1, 2),
        );
        for ch in "axb".chars() {
            drill.submit_character(ch);
        }
        drill.advance();
        drill.request_skip();

        let result = SessionResult::from_drill(&drill, TypingMode::Original, true);
        assert_eq!(result.units, 2);
        assert_eq!(result.completed, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.keystrokes, 3);
        assert_eq!(result.wrong_keystrokes, 2);
        assert_eq!(result.repeat_mode, RepeatMode::List);
        assert_eq!(result.list_rounds, 2);
        assert!(result.partial);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_old_records_fill_defaults() {
        let json = r#"{
            "timestamp": "2026-01-01T00:00:00Z",
            "units": 3, "completed": 3, "skipped": 0,
            "keystrokes": 12, "wrong_keystrokes": 1,
            "accuracy": 91.6, "wpm": 30.0, "elapsed_secs": 20.0
        }"#;
        let result: SessionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.repeat_mode, RepeatMode::None);
        assert_eq!(result.list_rounds, 1);
        assert_eq!(result.typing_mode, TypingMode::Original);
        assert!(!result.partial);
    }
}
