use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Regular, // ≥60 cols and ≥16 rows: typing area plus progress bar
    Compact, // anything smaller: typing area only
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 60 && area.height >= 16 {
            LayoutTier::Regular
        } else {
            LayoutTier::Compact
        }
    }

    pub fn show_progress_bar(&self) -> bool {
        *self == LayoutTier::Regular
    }
}

pub struct DrillLayout {
    pub header: Rect,
    pub main: Rect,
    pub progress: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl DrillLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let tier = LayoutTier::from_area(area);
        let footer_height = footer_lines.max(1);

        if tier.show_progress_bar() {
            let vertical = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(3),
                    Constraint::Length(footer_height),
                ])
                .split(area);
            Self {
                header: vertical[0],
                main: vertical[1],
                progress: Some(vertical[2]),
                footer: vertical[3],
                tier,
            }
        } else {
            let vertical = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(3),
                    Constraint::Length(footer_height),
                ])
                .split(area);
            Self {
                header: vertical[0],
                main: vertical[1],
                progress: None,
                footer: vertical[2],
                tier,
            }
        }
    }
}

/// Greedily pack key hints into as few lines as fit `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    const PREFIX: &str = "  ";
    const SEPARATOR: &str = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if current.is_empty() {
            format!("{PREFIX}{hint}")
        } else {
            format!("{current}{SEPARATOR}{hint}")
        };
        if candidate.chars().count() <= width || current.is_empty() {
            current = candidate;
        } else {
            out.push(std::mem::take(&mut current));
            current = format!("{PREFIX}{hint}");
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area.x + (area.width - target_w) / 2;
    let top = area.y + (area.height - target_h) / 2;

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_wrap_at_width() {
        let lines = pack_hint_lines(&["[Tab] Skip", "[Esc] Quit", "[^D] Dictation"], 26);
        assert_eq!(lines, vec!["  [Tab] Skip  [Esc] Quit", "  [^D] Dictation"]);
    }

    #[test]
    fn test_hints_empty() {
        assert!(pack_hint_lines(&[], 80).is_empty());
        assert!(pack_hint_lines(&["a"], 0).is_empty());
    }

    #[test]
    fn test_small_terminal_drops_progress_bar() {
        let layout = DrillLayout::new(Rect::new(0, 0, 40, 12), 1);
        assert_eq!(layout.tier, LayoutTier::Compact);
        assert!(layout.progress.is_none());

        let layout = DrillLayout::new(Rect::new(0, 0, 100, 30), 2);
        assert!(layout.progress.is_some());
        assert_eq!(layout.footer.height, 2);
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 30, 10);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup, area);
    }
}
