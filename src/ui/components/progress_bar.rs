use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::engine::progress::SessionProgress;
use crate::ui::theme::Theme;

/// Share of the list already behind the learner, with an `n/N` label.
pub struct ProgressBar<'a> {
    done: usize,
    total: usize,
    title: &'a str,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(progress: &SessionProgress, title: &'a str, theme: &'a Theme) -> Self {
        Self {
            done: progress.current_index().min(progress.len()),
            total: progress.len(),
            title,
            theme,
        }
    }

    fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.done as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled = (self.ratio() * inner.width as f64).round() as u16;
        for x in inner.left()..inner.right() {
            let style = if x < inner.x + filled {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label = format!("{}/{}", self.done, self.total);
        let label_x = inner.x + inner.width.saturating_sub(label.len() as u16) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
