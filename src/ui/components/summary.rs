use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::SessionResult;
use crate::ui::theme::Theme;

/// End-of-session results screen.
pub struct Summary<'a> {
    result: &'a SessionResult,
    best_wpm: Option<f64>,
    theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(result: &'a SessionResult, best_wpm: Option<f64>, theme: &'a Theme) -> Self {
        Self {
            result,
            best_wpm,
            theme,
        }
    }
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = self.result;

        let block = Block::bordered()
            .title(" Session Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "Well done!",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let label = |text: &'static str| Span::styled(text, Style::default().fg(colors.fg()));
        let value = |text: String| {
            Span::styled(
                text,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )
        };

        let acc_color = if result.accuracy >= 95.0 {
            colors.success()
        } else if result.accuracy >= 85.0 {
            colors.warning()
        } else {
            colors.error()
        };

        let mut wpm_spans = vec![label("  Speed:     "), value(format!("{:.0} WPM", result.wpm))];
        if let Some(best) = self.best_wpm {
            wpm_spans.push(Span::styled(
                format!("  (best {best:.0})"),
                Style::default().fg(colors.text_pending()),
            ));
        }

        let mut units_spans = vec![
            label("  Units:     "),
            value(format!("{}/{}", result.completed, result.units)),
        ];
        if result.skipped > 0 {
            units_spans.push(Span::styled(
                format!("  ({} skipped)", result.skipped),
                Style::default().fg(colors.warning()),
            ));
        }

        let mut lines = vec![
            Line::from(wpm_spans),
            Line::from(vec![
                label("  Accuracy:  "),
                Span::styled(
                    format!("{:.1}%", result.accuracy),
                    Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "  ({} of {} keystrokes wrong)",
                        result.wrong_keystrokes, result.keystrokes
                    ),
                    Style::default().fg(colors.text_pending()),
                ),
            ]),
            Line::from(vec![
                label("  Time:      "),
                value(format!("{:.1}s", result.elapsed_secs)),
            ]),
            Line::from(units_spans),
        ];
        if result.list_rounds > 1 {
            lines.push(Line::from(vec![
                label("  Rounds:    "),
                value(result.list_rounds.to_string()),
            ]));
        }
        Paragraph::new(lines).render(layout[1], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  [r] Restart  ", Style::default().fg(colors.accent())),
            Span::styled("[s] Settings  ", Style::default().fg(colors.accent())),
            Span::styled("[q/Esc] Quit", Style::default().fg(colors.accent())),
        ]))
        .render(layout[2], buf);
    }
}
