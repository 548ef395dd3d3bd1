use std::time::Instant;

use crate::engine::edit_stack::EditStack;
use crate::engine::progress::SessionProgress;
use crate::engine::repeat::{self, RepeatMode, RepeatState, Transition};
use crate::engine::tokenizer::Token;
use crate::engine::unit::PracticeUnit;
use crate::session::input::{BackspaceStep, TypingState};

/// State changes reported back to the caller after each command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrillEvent {
    CorrectCharacter(usize),
    TokenComplete { token_index: usize, text: String },
    UnitComplete { skipped: bool },
    EditReopened(usize),
    UnitRepeated { repeat: u32, target: u32 },
    ListRestarted { round: u32, target: u32 },
    UnitChanged(usize),
    SessionComplete,
}

#[derive(Clone, Debug, Default)]
pub struct DrillStats {
    pub keystrokes: usize,
    pub wrong_keystrokes: usize,
    pub correct_chars: usize,
    pub units_completed: usize,
    pub units_skipped: usize,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
}

impl DrillStats {
    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => start.elapsed().as_secs_f64(),
            _ => 0.0,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.keystrokes == 0 {
            return 100.0;
        }
        let good = self.keystrokes - self.wrong_keystrokes;
        (good as f64 / self.keystrokes as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn wpm(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if elapsed < 0.1 {
            return 0.0;
        }
        (self.correct_chars as f64 / 5.0) / (elapsed / 60.0)
    }
}

/// One practice session: the unit list, the repeat scheduler, the edit stack
/// and the live typing state for the current token.
pub struct Drill {
    progress: SessionProgress,
    repeat: RepeatState,
    edits: EditStack,
    typing: TypingState,
    token_index: usize,
    pub stats: DrillStats,
}

impl Drill {
    pub fn new(units: Vec<PracticeUnit>, repeat: RepeatState) -> Self {
        let mut drill = Self {
            progress: SessionProgress::new(units),
            repeat: repeat.restarted(),
            edits: EditStack::new(),
            typing: TypingState::default(),
            token_index: 0,
            stats: DrillStats::default(),
        };
        // Units always hold typable text, so this cannot complete the unit.
        drill.begin_unit(&mut Vec::new());
        drill
    }

    pub fn progress(&self) -> &SessionProgress {
        &self.progress
    }

    pub fn repeat(&self) -> RepeatState {
        self.repeat
    }

    pub fn edits(&self) -> &EditStack {
        &self.edits
    }

    pub fn typing(&self) -> &TypingState {
        &self.typing
    }

    pub fn token_index(&self) -> usize {
        self.token_index
    }

    pub fn current_unit(&self) -> Option<&PracticeUnit> {
        self.progress.current_unit()
    }

    pub fn current_token(&self) -> Option<&Token> {
        self.current_unit()?.tokens.get(self.token_index)
    }

    pub fn is_complete(&self) -> bool {
        self.progress.is_complete()
    }

    pub fn dictation(&self) -> bool {
        self.progress.dictation
    }

    /// Every token of the current unit is done and the caller has not advanced yet.
    pub fn is_awaiting_advance(&self) -> bool {
        self.current_unit()
            .is_some_and(|unit| self.token_index >= unit.tokens.len())
    }

    pub fn submit_character(&mut self, ch: char) -> Vec<DrillEvent> {
        if ch.is_whitespace() {
            return self.request_confirm();
        }

        let mut events = Vec::new();
        let Some(token) = self
            .progress
            .current_unit()
            .and_then(|unit| unit.tokens.get(self.token_index))
        else {
            return events;
        };

        if self.stats.started_at.is_none() {
            self.stats.started_at = Some(Instant::now());
        }
        self.stats.keystrokes += 1;

        let step = self.typing.process_char(token, ch);
        if step.wrong {
            self.stats.wrong_keystrokes += 1;
        }
        self.stats.correct_chars += step.newly_correct.len();
        events.extend(
            step.newly_correct
                .into_iter()
                .map(DrillEvent::CorrectCharacter),
        );

        if step.became_complete {
            self.complete_token(&mut events);
        }
        events
    }

    /// Move past a reopened token that is already correct. Ignored otherwise.
    pub fn request_confirm(&mut self) -> Vec<DrillEvent> {
        let mut events = Vec::new();
        let satisfied = self
            .current_token()
            .is_some_and(|token| self.typing.is_complete(token));
        if satisfied {
            self.complete_token(&mut events);
        }
        events
    }

    /// Delete before the cursor, or reopen the previous token when the
    /// current one has no input.
    pub fn request_backspace(&mut self) -> Vec<DrillEvent> {
        let mut events = Vec::new();
        if self.is_complete() {
            return events;
        }

        if let Some(token) = self
            .progress
            .current_unit()
            .and_then(|unit| unit.tokens.get(self.token_index))
        {
            if self.typing.process_backspace(token) == BackspaceStep::Deleted {
                return events;
            }
        }

        self.reopen_previous(&mut events);
        events
    }

    /// Force the current unit complete regardless of correctness, then advance.
    pub fn request_skip(&mut self) -> Vec<DrillEvent> {
        let mut events = Vec::new();
        if self.is_complete() {
            return events;
        }
        if !self.is_awaiting_advance() {
            let len = self.current_unit().map_or(0, |unit| unit.tokens.len());
            self.token_index = len;
            self.typing = TypingState::default();
            self.stats.units_skipped += 1;
            events.push(DrillEvent::UnitComplete { skipped: true });
        }
        events.extend(self.advance());
        events
    }

    /// Reopen a completed token of the current unit, discarding every token
    /// typed after it.
    pub fn request_jump_to(&mut self, token_index: usize) -> Vec<DrillEvent> {
        let mut events = Vec::new();
        if token_index >= self.token_index {
            return events;
        }
        let Some(unit) = self.progress.current_unit() else {
            return events;
        };
        let Some(token) = unit.tokens.get(token_index) else {
            return events;
        };
        if token.is_empty() {
            return events;
        }
        let was_awaiting = self.token_index >= unit.tokens.len();
        if let Some(entry) = self.edits.jump_to(token_index) {
            if was_awaiting {
                self.stats.units_completed = self.stats.units_completed.saturating_sub(1);
            }
            self.token_index = entry.token_index;
            self.typing = TypingState::reopened(token, &entry.text);
            events.push(DrillEvent::EditReopened(entry.token_index));
        }
        events
    }

    /// Consult the repeat scheduler after a unit completed and move on.
    pub fn advance(&mut self) -> Vec<DrillEvent> {
        let mut events = Vec::new();
        if !self.is_awaiting_advance() {
            return events;
        }

        let (repeat, transition) = repeat::on_unit_complete(self.repeat, self.progress.is_last());
        self.repeat = repeat;
        self.progress.apply(transition);

        match transition {
            Transition::RepeatUnit => {
                tracing::debug!(
                    repeat = repeat.word_repeat,
                    target = repeat.word_repeat_target,
                    "repeating unit"
                );
                events.push(DrillEvent::UnitRepeated {
                    repeat: repeat.word_repeat,
                    target: repeat.word_repeat_target,
                });
            }
            Transition::NextUnit => {
                events.push(DrillEvent::UnitChanged(self.progress.current_index()));
            }
            Transition::RestartList => {
                tracing::info!(
                    round = repeat.list_round,
                    target = repeat.list_repeat_target,
                    "starting next list round"
                );
                events.push(DrillEvent::ListRestarted {
                    round: repeat.list_round,
                    target: repeat.list_repeat_target,
                });
                events.push(DrillEvent::UnitChanged(0));
            }
            Transition::Complete => {
                self.stats.finished_at = Some(Instant::now());
                tracing::info!(
                    completed = self.stats.units_completed,
                    skipped = self.stats.units_skipped,
                    "session complete"
                );
                events.push(DrillEvent::SessionComplete);
            }
        }

        self.begin_unit(&mut events);
        events
    }

    pub fn go_to_previous(&mut self) -> Vec<DrillEvent> {
        let mut events = Vec::new();
        if self.progress.go_to_previous() {
            events.push(DrillEvent::UnitChanged(self.progress.current_index()));
            self.begin_unit(&mut events);
        }
        events
    }

    pub fn go_to_next(&mut self) -> Vec<DrillEvent> {
        let mut events = Vec::new();
        if self.progress.go_to_next() {
            events.push(DrillEvent::UnitChanged(self.progress.current_index()));
            self.begin_unit(&mut events);
        }
        events
    }

    /// Back to the first unit with fresh counters; the repeat mode is kept.
    pub fn restart(&mut self) -> Vec<DrillEvent> {
        self.progress.restart();
        self.repeat = self.repeat.restarted();
        self.stats = DrillStats::default();
        let mut events = vec![DrillEvent::UnitChanged(0)];
        self.begin_unit(&mut events);
        events
    }

    /// Swap the practice list wholesale (typing mode switch). A finished
    /// session starts over with fresh stats.
    pub fn replace_units(&mut self, units: Vec<PracticeUnit>) -> Vec<DrillEvent> {
        if self.is_complete() {
            self.stats = DrillStats::default();
        }
        self.progress.replace_units(units);
        self.repeat = self.repeat.restarted();
        let mut events = vec![DrillEvent::UnitChanged(0)];
        self.begin_unit(&mut events);
        events
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = self.repeat.with_mode(mode);
    }

    pub fn set_repeat_targets(&mut self, word: u32, list: u32) {
        self.repeat = self.repeat.with_targets(word, list);
    }

    pub fn set_dictation(&mut self, on: bool) {
        self.progress.dictation = on;
    }

    fn complete_token(&mut self, events: &mut Vec<DrillEvent>) {
        let text = self.typing.confirmed_text();
        self.edits.push(self.token_index, text.clone());
        events.push(DrillEvent::TokenComplete {
            token_index: self.token_index,
            text,
        });
        self.token_index += 1;
        self.settle(events);
    }

    fn begin_unit(&mut self, events: &mut Vec<DrillEvent>) {
        self.edits.clear();
        self.token_index = 0;
        self.typing = TypingState::default();
        self.settle(events);
    }

    /// Auto-satisfy punctuation-only tokens at the cursor, then either prime
    /// the next token or report the unit complete.
    fn settle(&mut self, events: &mut Vec<DrillEvent>) {
        let Some(unit) = self.progress.current_unit() else {
            return;
        };
        while self.token_index < unit.tokens.len() && unit.tokens[self.token_index].is_empty() {
            self.edits.push(self.token_index, String::new());
            events.push(DrillEvent::TokenComplete {
                token_index: self.token_index,
                text: String::new(),
            });
            self.token_index += 1;
        }

        if let Some(token) = unit.tokens.get(self.token_index) {
            self.typing = TypingState::new(token);
        } else {
            self.typing = TypingState::default();
            self.stats.units_completed += 1;
            tracing::debug!(unit = self.progress.current_index(), "unit complete");
            events.push(DrillEvent::UnitComplete { skipped: false });
        }
    }

    /// Reopen the most recent token that has characters to edit. Trailing
    /// punctuation-only entries are discarded on the way.
    fn reopen_previous(&mut self, events: &mut Vec<DrillEvent>) {
        let Some(unit) = self.progress.current_unit() else {
            return;
        };
        let typable = |index: usize| unit.tokens.get(index).is_some_and(|t| !t.is_empty());

        let entry = if self.edits.last().is_some_and(|e| typable(e.token_index)) {
            self.edits.pop_to_previous()
        } else {
            let target = self
                .edits
                .entries()
                .iter()
                .rev()
                .find(|e| typable(e.token_index))
                .map(|e| e.token_index);
            target.and_then(|index| self.edits.jump_to(index))
        };

        let Some(entry) = entry else {
            return;
        };
        if self.token_index >= unit.tokens.len() {
            // Leaving the satisfied state; a later completion is a new transition.
            self.stats.units_completed = self.stats.units_completed.saturating_sub(1);
        }
        self.token_index = entry.token_index;
        self.typing = TypingState::reopened(&unit.tokens[entry.token_index], &entry.text);
        events.push(DrillEvent::EditReopened(entry.token_index));
    }
}
