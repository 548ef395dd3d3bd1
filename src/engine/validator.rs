use crate::engine::matcher::chars_match;
use crate::engine::tokenizer::Token;

/// A token is complete when every position up to its length holds a
/// case-insensitively equal character. Full length alone is not enough.
pub fn is_complete(token: &Token, typed: &[Option<char>], cursor: usize) -> bool {
    if cursor != token.len() || typed.len() < cursor {
        return false;
    }
    token
        .characters
        .iter()
        .zip(typed)
        .all(|(&expected, slot)| slot.is_some_and(|actual| chars_match(actual, expected)))
}

/// Whole-text check for a token that was confirmed earlier (edit stack entries).
pub fn text_matches(token: &Token, text: &str) -> bool {
    let typed: Vec<Option<char>> = text.chars().map(Some).collect();
    is_complete(token, &typed, typed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::matcher::match_input;

    #[test]
    fn test_complete_after_full_match() {
        let token = Token::new("cats");
        let input: Vec<char> = "CATS".chars().collect();
        let out = match_input(&token, &input);
        assert!(is_complete(&token, &out.typed, out.cursor));
    }

    #[test]
    fn test_incomplete_when_short() {
        let token = Token::new("cats");
        let input: Vec<char> = "cat".chars().collect();
        let out = match_input(&token, &input);
        assert!(!is_complete(&token, &out.typed, out.cursor));
    }

    #[test]
    fn test_full_length_with_hole_is_not_complete() {
        let token = Token::new("abc");
        let typed = vec![Some('a'), None, Some('c')];
        assert!(!is_complete(&token, &typed, 3));
    }

    #[test]
    fn test_full_length_with_wrong_char_is_not_complete() {
        let token = Token::new("abc");
        let typed = vec![Some('a'), Some('x'), Some('c')];
        assert!(!is_complete(&token, &typed, 3));
    }

    #[test]
    fn test_empty_token_is_complete() {
        let token = Token::new("!");
        assert!(is_complete(&token, &[], 0));
    }

    #[test]
    fn test_text_matches_ignores_case_but_not_punctuation() {
        let token = Token::new("Happy.");
        assert!(text_matches(&token, "hAPPY"));
        assert!(!text_matches(&token, "happy."));
        assert!(!text_matches(&token, "happ"));
    }
}
