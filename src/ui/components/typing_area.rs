use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::matcher::CharVerdict;
use crate::session::view::{TokenStatus, TokenView};
use crate::ui::theme::{Theme, ThemeColors};

pub struct TypingArea<'a> {
    tokens: &'a [TokenView],
    title: String,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(tokens: &'a [TokenView], title: String, theme: &'a Theme) -> Self {
        Self {
            tokens,
            title,
            theme,
        }
    }
}

fn cell_style(colors: &ThemeColors, status: TokenStatus, verdict: CharVerdict) -> Style {
    match (status, verdict) {
        (TokenStatus::Done { correct: true }, _) => Style::default().fg(colors.text_correct()),
        (TokenStatus::Done { correct: false }, _) => Style::default()
            .fg(colors.text_incorrect())
            .add_modifier(Modifier::UNDERLINED),
        (_, CharVerdict::Correct) => Style::default().fg(colors.text_correct()),
        (_, CharVerdict::Wrong) => Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg())
            .add_modifier(Modifier::UNDERLINED),
        (_, CharVerdict::Cursor) => Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg()),
        (TokenStatus::Current, CharVerdict::Pending) => Style::default().fg(colors.fg()),
        (_, CharVerdict::Pending) => Style::default().fg(colors.text_pending()),
    }
}

/// One line of spans: each token, its trailing punctuation, then a gap.
fn token_spans<'a>(tokens: &'a [TokenView], colors: &ThemeColors) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        for cell in &token.cells {
            spans.push(Span::styled(
                cell.glyph.to_string(),
                cell_style(colors, token.status, cell.verdict),
            ));
        }
        if !token.punctuation.is_empty() {
            spans.push(Span::styled(
                token.punctuation.as_str(),
                Style::default().fg(colors.text_pending()),
            ));
        }
    }
    spans
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(self.title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        // Vertically center the unit text.
        let mut lines = vec![Line::default(); (inner.height / 2).saturating_sub(1) as usize];
        lines.push(Line::from(token_spans(self.tokens, colors)));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
