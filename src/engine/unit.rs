use crate::engine::tokenizer::{Token, tokenize};

/// Shown when the practice list is missing, empty, or unreadable.
pub const PLACEHOLDER_TEXT: &str = "test";

/// One drill item: a single word (one token) or a sentence (several).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeUnit {
    pub raw_text: String,
    pub tokens: Vec<Token>,
}

impl PracticeUnit {
    pub fn new(text: &str) -> Self {
        Self {
            raw_text: text.trim().to_string(),
            tokens: tokenize(text),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_TEXT)
    }

    pub fn is_sentence(&self) -> bool {
        self.tokens.len() > 1
    }

    /// Units made only of punctuation could never be typed.
    pub fn has_typable_text(&self) -> bool {
        self.char_count() > 0
    }

    pub fn char_count(&self) -> usize {
        self.tokens.iter().map(Token::len).sum()
    }
}

/// Build units from raw strings, dropping entries with nothing to type.
/// Never returns an empty list: a placeholder unit stands in instead.
pub fn units_from_texts<S: AsRef<str>>(texts: &[S]) -> Vec<PracticeUnit> {
    let units: Vec<PracticeUnit> = texts
        .iter()
        .map(|t| PracticeUnit::new(t.as_ref()))
        .filter(PracticeUnit::has_typable_text)
        .collect();
    if units.is_empty() {
        vec![PracticeUnit::placeholder()]
    } else {
        units
    }
}
