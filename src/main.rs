use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Result, anyhow};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use tracing_subscriber::EnvFilter;

use vocadrill::app::{App, AppScreen, SETTINGS_ITEMS};
use vocadrill::config::Config;
use vocadrill::engine::repeat::RepeatMode;
use vocadrill::event::{AppEvent, EventHandler, TICK_RATE};
use vocadrill::session::unit_list::{PracticeList, TypingMode};
use vocadrill::session::view::token_views;
use vocadrill::speech::speaker_for;
use vocadrill::store::json_store::JsonStore;
use vocadrill::ui::components::progress_bar::ProgressBar;
use vocadrill::ui::components::summary::Summary;
use vocadrill::ui::components::typing_area::TypingArea;
use vocadrill::ui::layout::{DrillLayout, centered_rect, pack_hint_lines};
use vocadrill::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "vocadrill",
    version,
    about = "Terminal vocabulary typing trainer with word and list repeat drills"
)]
struct Cli {
    #[arg(help = "Practice list: plain text (one word or sentence per line) or JSON")]
    list: Option<PathBuf>,

    #[arg(short, long, help = "Repeat mode (word, list, none)")]
    repeat: Option<String>,

    #[arg(long, help = "Completions required per unit in word repeat mode")]
    word_repeat: Option<u32>,

    #[arg(long, help = "Passes over the list in list repeat mode")]
    list_repeat: Option<u32>,

    #[arg(short, long, help = "Hide untyped letters")]
    dictation: bool,

    #[arg(short, long, help = "Practice base forms instead of the words as listed")]
    base_form: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Text-to-speech command, e.g. \"espeak -s 140\"")]
    speech_command: Option<String>,

    #[arg(long, help = "Pause after each unit in milliseconds")]
    delay: Option<u64>,
}

fn init_logging() -> Result<PathBuf> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocadrill");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("vocadrill.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "vocadrill=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install logger: {err}"))?;
    Ok(log_path)
}

fn apply_cli(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(ref name) = cli.repeat {
        config.repeat_mode = RepeatMode::from_name(name)
            .ok_or_else(|| anyhow!("unknown repeat mode `{name}` (expected word, list or none)"))?;
    }
    if let Some(n) = cli.word_repeat {
        config.word_repeat_target = n;
    }
    if let Some(n) = cli.list_repeat {
        config.list_repeat_target = n;
    }
    if cli.dictation {
        config.dictation_mode = true;
    }
    if cli.base_form {
        config.typing_mode = TypingMode::BaseForm;
    }
    if let Some(ref theme) = cli.theme {
        config.theme = theme.clone();
    }
    if let Some(ref cmd) = cli.speech_command {
        config.speech_command = Some(cmd.clone());
    }
    if let Some(delay) = cli.delay {
        config.advance_delay_ms = delay;
    }
    config.normalize();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = init_logging() {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "config unreadable, using defaults");
        Config::default()
    });
    apply_cli(&mut config, &cli)?;

    let mut status = None;
    let list = match cli.list {
        Some(ref path) => PracticeList::load(path).unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to placeholder list");
            status = Some(err.to_string());
            PracticeList::default()
        }),
        None => PracticeList::default(),
    };

    let store = JsonStore::new()
        .map_err(|err| tracing::warn!(%err, "history disabled"))
        .ok();
    let speaker = speaker_for(config.speech_command.as_deref());

    let mut app = App::new(config, list, store, speaker);
    app.config_path = Some(Config::config_path());
    app.status = status;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_RATE);

    app.start();
    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(%err, "exited with error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match app.screen {
        AppScreen::Drill => handle_drill_key(app, key),
        AppScreen::Complete => handle_complete_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_drill_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('d') => app.toggle_dictation(),
            KeyCode::Char('t') => app.toggle_typing_mode(),
            KeyCode::Char('p') => app.speak_current(),
            KeyCode::Char('r') => app.restart(),
            KeyCode::Char('o') => app.go_to_settings(),
            _ => {}
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(ch) = key.code
            && let Some(n) = ch.to_digit(10).filter(|n| *n >= 1)
        {
            app.jump_to_token(n as usize - 1);
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Tab | KeyCode::Enter => app.skip(),
        KeyCode::Left => app.previous_unit(),
        KeyCode::Right => app.next_unit(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_complete_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.restart(),
        KeyCode::Char('s') => app.go_to_settings(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.leave_settings(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.settings_selected = (app.settings_selected + 1).min(SETTINGS_ITEMS.len() - 1);
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle_forward(),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle_backward(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Drill => render_drill(frame, app),
        AppScreen::Complete => render_complete(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn header_line(app: &App) -> Line<'static> {
    let colors = &app.theme.colors;
    let progress = app.drill.progress();
    let repeat = app.drill.repeat();
    let style = Style::default()
        .fg(colors.header_fg())
        .bg(colors.header_bg());

    let mut spans = vec![
        Span::styled(" vocadrill ", style.add_modifier(Modifier::BOLD)),
        Span::styled(
            format!(
                "| {}/{} ",
                (progress.current_index() + 1).min(progress.len()),
                progress.len()
            ),
            style,
        ),
    ];
    match repeat.mode {
        RepeatMode::Word => spans.push(Span::styled(
            format!("| Repeat {}/{} ", repeat.word_repeat, repeat.word_repeat_target),
            style.fg(colors.highlight()),
        )),
        RepeatMode::List => spans.push(Span::styled(
            format!("| Round {}/{} ", repeat.list_round, repeat.list_repeat_target),
            style.fg(colors.highlight()),
        )),
        RepeatMode::None => {}
    }
    if app.config.dictation_mode {
        spans.push(Span::styled("| Dictation ", style.fg(colors.accent())));
    }
    if app.config.typing_mode == TypingMode::BaseForm {
        spans.push(Span::styled("| Base form ", style.fg(colors.accent())));
    }
    if let Some(ref status) = app.status {
        spans.push(Span::styled(format!("| {status} "), style.fg(colors.warning())));
    }
    Line::from(spans)
}

fn render_drill(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let hints = [
        "[Space] Next",
        "[Tab] Skip",
        "[\u{2190}/\u{2192}] Prev/Next unit",
        "[Alt+N] Edit word N",
        "[^D] Dictation",
        "[^T] Base form",
        "[^P] Speak",
        "[^R] Restart",
        "[^O] Settings",
        "[Esc] Quit",
    ];
    let hint_lines = pack_hint_lines(&hints, area.width as usize);
    let layout = DrillLayout::new(area, hint_lines.len() as u16);

    let header = Paragraph::new(header_line(app))
        .block(Block::bordered().border_style(Style::default().fg(colors.border())))
        .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let views = token_views(&app.drill);
    let kind = match app.drill.current_unit() {
        Some(unit) if unit.is_sentence() => "Sentence",
        _ => "Word",
    };
    let title = if app.is_advance_pending() {
        format!(" {kind} \u{2713} ")
    } else {
        format!(" {kind} ")
    };
    frame.render_widget(TypingArea::new(&views, title, app.theme), layout.main);

    if let Some(progress_area) = layout.progress {
        frame.render_widget(
            ProgressBar::new(app.drill.progress(), "Progress", app.theme),
            progress_area,
        );
    }

    let footer_lines: Vec<Line> = hint_lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.text_pending()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_complete(frame: &mut ratatui::Frame, app: &App) {
    let area = centered_rect(60, 60, frame.area());
    if let Some(ref result) = app.last_result {
        let summary = Summary::new(result, app.history.best_wpm(), app.theme);
        frame.render_widget(summary, area);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    Paragraph::new(Line::from(Span::styled(
        "  Up/Down to select, Left/Right to change",
        Style::default().fg(colors.text_pending()),
    )))
    .render(layout[0], frame.buffer_mut());

    let available = Theme::available_themes().len();
    let lines: Vec<Line> = SETTINGS_ITEMS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let selected = i == app.settings_selected;
            let indicator = if selected { " > " } else { "   " };
            let label_style = if selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let value_style = Style::default().fg(if selected {
                colors.highlight()
            } else {
                colors.text_pending()
            });
            let mut value = app.settings_value(i);
            if i == SETTINGS_ITEMS.len() - 1 {
                value = format!("{value} ({available} available)");
            }
            Line::from(vec![
                Span::styled(format!("{indicator}{label:<22}"), label_style),
                Span::styled(format!("< {value} >"), value_style),
            ])
        })
        .collect();
    Paragraph::new(lines).render(layout[1], frame.buffer_mut());

    Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back",
        Style::default().fg(colors.accent()),
    )))
    .render(layout[2], frame.buffer_mut());
}
