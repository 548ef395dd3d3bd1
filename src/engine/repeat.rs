use serde::{Deserialize, Serialize};

/// Which repetition rule applies when a unit completes. Exactly one is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    Word,
    List,
    #[default]
    None,
}

impl RepeatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RepeatMode::Word => "word",
            RepeatMode::List => "list",
            RepeatMode::None => "none",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "word" => Some(RepeatMode::Word),
            "list" => Some(RepeatMode::List),
            "none" | "off" => Some(RepeatMode::None),
            _ => None,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::Word,
            RepeatMode::Word => RepeatMode::List,
            RepeatMode::List => RepeatMode::None,
        }
    }
}

/// What the session does after a unit completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Retype the same unit (word repeat still counting).
    RepeatUnit,
    NextUnit,
    /// Last unit done, another list round starts at index 0.
    RestartList,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatState {
    pub mode: RepeatMode,
    pub word_repeat_target: u32,
    pub list_repeat_target: u32,
    pub word_repeat: u32,
    pub list_round: u32,
}

impl Default for RepeatState {
    fn default() -> Self {
        Self::new(RepeatMode::None, 1, 1)
    }
}

impl RepeatState {
    pub fn new(mode: RepeatMode, word_repeat_target: u32, list_repeat_target: u32) -> Self {
        Self {
            mode,
            word_repeat_target: word_repeat_target.max(1),
            list_repeat_target: list_repeat_target.max(1),
            word_repeat: 1,
            list_round: 1,
        }
    }

    /// Counters back to 1; the selected mode and targets are kept.
    pub fn restarted(self) -> Self {
        Self {
            word_repeat: 1,
            list_round: 1,
            ..self
        }
    }

    /// Switch modes. Counters stay in memory, only the active mode's rules apply.
    pub fn with_mode(self, mode: RepeatMode) -> Self {
        Self { mode, ..self }
    }

    pub fn with_targets(self, word_repeat_target: u32, list_repeat_target: u32) -> Self {
        Self {
            word_repeat_target: word_repeat_target.max(1),
            list_repeat_target: list_repeat_target.max(1),
            ..self
        }
    }
}

/// Transition applied on "unit complete". `is_last` tells whether the
/// completed unit is the final one in the list.
pub fn on_unit_complete(state: RepeatState, is_last: bool) -> (RepeatState, Transition) {
    let advance = if is_last {
        Transition::Complete
    } else {
        Transition::NextUnit
    };

    match state.mode {
        RepeatMode::Word if state.word_repeat < state.word_repeat_target => (
            RepeatState {
                word_repeat: state.word_repeat + 1,
                ..state
            },
            Transition::RepeatUnit,
        ),
        RepeatMode::Word => (
            RepeatState {
                word_repeat: 1,
                ..state
            },
            advance,
        ),
        RepeatMode::List if is_last && state.list_round < state.list_repeat_target => (
            RepeatState {
                list_round: state.list_round + 1,
                ..state
            },
            Transition::RestartList,
        ),
        RepeatMode::List | RepeatMode::None => (state, advance),
    }
}
