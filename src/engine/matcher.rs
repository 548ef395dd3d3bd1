use crate::engine::tokenizer::Token;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CharVerdict {
    #[default]
    Pending,
    Correct,
    Wrong,
    Cursor,
}

/// Result of matching a live input buffer against one token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// One slot per token character; `Some` only for confirmed-correct positions.
    pub typed: Vec<Option<char>>,
    pub cursor: usize,
    pub satisfied: bool,
    pub verdicts: Vec<CharVerdict>,
}

impl MatchOutcome {
    /// Confirmed text as the learner typed it (original casing).
    pub fn confirmed_text(&self) -> String {
        self.typed.iter().take(self.cursor).flatten().collect()
    }
}

/// Case-insensitive single character comparison.
pub fn chars_match(typed: char, expected: char) -> bool {
    typed.to_lowercase().eq(expected.to_lowercase())
}

/// Re-evaluate the whole buffer against the token, stopping at the first
/// divergence. A mismatching character is never recorded.
pub fn match_input(token: &Token, input: &[char]) -> MatchOutcome {
    let len = token.len();
    let mut typed = vec![None; len];
    let mut cursor = 0;

    for (i, (&actual, &expected)) in input.iter().zip(&token.characters).enumerate() {
        if !chars_match(actual, expected) {
            break;
        }
        typed[i] = Some(actual);
        cursor = i + 1;
    }

    let verdicts = (0..len)
        .map(|i| {
            if i < cursor {
                CharVerdict::Correct
            } else if i == cursor && input.len() > cursor {
                CharVerdict::Wrong
            } else if i == cursor {
                CharVerdict::Cursor
            } else {
                CharVerdict::Pending
            }
        })
        .collect();

    MatchOutcome {
        typed,
        cursor,
        satisfied: cursor == len,
        verdicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_full_correct_input_satisfies() {
        let token = Token::new("cats");
        let out = match_input(&token, &chars("cats"));
        assert!(out.satisfied);
        assert_eq!(out.cursor, 4);
        assert!(out.verdicts.iter().all(|v| *v == CharVerdict::Correct));
    }

    #[test]
    fn test_case_insensitive() {
        let token = Token::new("Cats");
        let out = match_input(&token, &chars("cATS"));
        assert!(out.satisfied);
        assert_eq!(out.confirmed_text(), "cATS");
    }

    #[test]
    fn test_stops_at_first_wrong_character() {
        let token = Token::new("cats");
        let out = match_input(&token, &chars("cots"));
        assert_eq!(out.cursor, 1);
        assert!(!out.satisfied);
        assert_eq!(out.typed, vec![Some('c'), None, None, None]);
        assert_eq!(
            out.verdicts,
            vec![
                CharVerdict::Correct,
                CharVerdict::Wrong,
                CharVerdict::Pending,
                CharVerdict::Pending
            ]
        );
    }

    #[test]
    fn test_recovers_after_correction() {
        let token = Token::new("cats");
        assert_eq!(match_input(&token, &chars("co")).cursor, 1);
        assert_eq!(match_input(&token, &chars("ca")).cursor, 2);
        assert_eq!(match_input(&token, &chars("cat")).cursor, 3);
        assert!(match_input(&token, &chars("cats")).satisfied);
    }

    #[test]
    fn test_cursor_verdict_on_empty_input() {
        let token = Token::new("ab");
        let out = match_input(&token, &[]);
        assert_eq!(out.cursor, 0);
        assert_eq!(out.verdicts, vec![CharVerdict::Cursor, CharVerdict::Pending]);
    }

    #[test]
    fn test_extra_input_beyond_token_is_ignored() {
        let token = Token::new("ab");
        let out = match_input(&token, &chars("abzz"));
        assert!(out.satisfied);
        assert_eq!(out.cursor, 2);
    }

    #[test]
    fn test_empty_token_is_satisfied() {
        let token = Token::new("...");
        let out = match_input(&token, &[]);
        assert!(out.satisfied);
        assert!(out.verdicts.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let token = Token::new("happy");
        let input = chars("hapx");
        assert_eq!(match_input(&token, &input), match_input(&token, &input));
    }

    #[test]
    fn test_monotonic_cursor_under_correct_typing() {
        let token = Token::new("vocabulary");
        let mut input = Vec::new();
        let mut last = 0;
        for &ch in &token.characters {
            input.push(ch);
            let out = match_input(&token, &input);
            assert_eq!(out.cursor, last + 1);
            last = out.cursor;
        }
        assert!(match_input(&token, &input).satisfied);
    }

    #[test]
    fn test_stop_on_error_holds_regardless_of_later_input() {
        let token = Token::new("word");
        for k in 0..token.len() {
            let mut input: Vec<char> = token.characters[..k].to_vec();
            input.push('#');
            input.extend(token.characters[k + 1..].iter());
            assert_eq!(match_input(&token, &input).cursor, k);
        }
    }
}
