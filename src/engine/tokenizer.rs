/// Characters stripped from the end of a chunk and kept for display only.
pub const TRAILING_PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

/// One typable word-like chunk of a practice unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub characters: Vec<char>,
    pub trailing_punctuation: String,
}

impl Token {
    pub fn new(chunk: &str) -> Self {
        let base = chunk.trim_end_matches(TRAILING_PUNCTUATION);
        Self {
            characters: base.chars().collect(),
            trailing_punctuation: chunk[base.len()..].to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Punctuation-only chunks have nothing to type and are auto-satisfied.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// The matchable text without trailing punctuation.
    pub fn text(&self) -> String {
        self.characters.iter().collect()
    }

    pub fn display(&self) -> String {
        format!("{}{}", self.text(), self.trailing_punctuation)
    }
}

/// Split a practice unit on whitespace runs into tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace().map(Token::new).collect()
}
