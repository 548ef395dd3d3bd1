use crate::engine::matcher::{CharVerdict, MatchOutcome, match_input};
use crate::engine::tokenizer::Token;
use crate::engine::validator;

/// What a single keystroke did to the current token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharStep {
    /// Token positions confirmed correct by this keystroke.
    pub newly_correct: Vec<usize>,
    pub wrong: bool,
    /// The token moved from unsatisfied to satisfied on this keystroke.
    pub became_complete: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackspaceStep {
    Deleted,
    /// Buffer already empty: the caller should reopen the previous token.
    AtTokenStart,
}

/// Live input for the current token and the match derived from it.
#[derive(Clone, Debug, Default)]
pub struct TypingState {
    buffer: Vec<char>,
    outcome: MatchOutcome,
}

impl TypingState {
    pub fn new(token: &Token) -> Self {
        Self {
            buffer: Vec::new(),
            outcome: match_input(token, &[]),
        }
    }

    /// Seed from a previously confirmed text; editing resumes at its end.
    pub fn reopened(token: &Token, text: &str) -> Self {
        let buffer: Vec<char> = text.chars().collect();
        let outcome = match_input(token, &buffer);
        Self { buffer, outcome }
    }

    pub fn typed(&self) -> &[Option<char>] {
        &self.outcome.typed
    }

    pub fn cursor(&self) -> usize {
        self.outcome.cursor
    }

    pub fn verdicts(&self) -> &[CharVerdict] {
        &self.outcome.verdicts
    }

    pub fn is_satisfied(&self) -> bool {
        self.outcome.satisfied
    }

    pub fn has_wrong_tail(&self) -> bool {
        self.buffer.len() > self.outcome.cursor
    }

    pub fn confirmed_text(&self) -> String {
        self.outcome.confirmed_text()
    }

    pub fn is_complete(&self, token: &Token) -> bool {
        validator::is_complete(token, &self.outcome.typed, self.outcome.cursor)
    }

    pub fn process_char(&mut self, token: &Token, ch: char) -> CharStep {
        let was_complete = self.is_complete(token);
        let before = self.outcome.cursor;

        self.buffer.push(ch);
        self.outcome = match_input(token, &self.buffer);

        let after = self.outcome.cursor;
        CharStep {
            newly_correct: (before..after).collect(),
            wrong: after == before && !self.outcome.satisfied,
            became_complete: !was_complete && self.is_complete(token),
        }
    }

    pub fn process_backspace(&mut self, token: &Token) -> BackspaceStep {
        if self.buffer.pop().is_none() {
            return BackspaceStep::AtTokenStart;
        }
        self.outcome = match_input(token, &self.buffer);
        BackspaceStep::Deleted
    }
}
