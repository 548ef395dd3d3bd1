use crate::engine::matcher::CharVerdict;
use crate::engine::validator;
use crate::session::drill::Drill;

/// Glyph shown for characters not yet typed while dictation is on.
pub const DICTATION_PLACEHOLDER: char = '_';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
    Done { correct: bool },
    Current,
    Upcoming,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellView {
    pub glyph: char,
    pub verdict: CharVerdict,
}

/// Render-ready projection of one token. Dictation only changes glyphs here;
/// matching never sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenView {
    pub index: usize,
    pub status: TokenStatus,
    pub cells: Vec<CellView>,
    pub punctuation: String,
}

impl TokenView {
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.glyph).collect()
    }
}

pub fn token_views(drill: &Drill) -> Vec<TokenView> {
    let Some(unit) = drill.current_unit() else {
        return Vec::new();
    };
    let dictation = drill.dictation();
    let current = drill.token_index();

    unit.tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let (status, cells) = if index < current {
                let typed = drill
                    .edits()
                    .get(index)
                    .map(|e| e.text.as_str())
                    .unwrap_or_default();
                let correct = validator::text_matches(token, typed);
                let mut glyphs = typed.chars();
                let cells = token
                    .characters
                    .iter()
                    .map(|&target| CellView {
                        glyph: glyphs.next().unwrap_or(target),
                        verdict: CharVerdict::Correct,
                    })
                    .collect();
                (TokenStatus::Done { correct }, cells)
            } else if index == current {
                let typing = drill.typing();
                let cells = token
                    .characters
                    .iter()
                    .enumerate()
                    .map(|(i, &target)| {
                        let verdict = typing.verdicts().get(i).copied().unwrap_or_default();
                        let glyph = match typing.typed().get(i).copied().flatten() {
                            Some(ch) => ch,
                            None if dictation => DICTATION_PLACEHOLDER,
                            None => target,
                        };
                        CellView { glyph, verdict }
                    })
                    .collect();
                (TokenStatus::Current, cells)
            } else {
                let cells = token
                    .characters
                    .iter()
                    .map(|&target| CellView {
                        glyph: if dictation { DICTATION_PLACEHOLDER } else { target },
                        verdict: CharVerdict::Pending,
                    })
                    .collect();
                (TokenStatus::Upcoming, cells)
            };

            TokenView {
                index,
                status,
                cells,
                punctuation: token.trailing_punctuation.clone(),
            }
        })
        .collect()
}
