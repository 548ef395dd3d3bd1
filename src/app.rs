use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::{Config, MAX_ADVANCE_DELAY_MS, MAX_REPEAT_TARGET};
use crate::session::drill::{Drill, DrillEvent};
use crate::session::result::SessionResult;
use crate::session::unit_list::PracticeList;
use crate::speech::Speaker;
use crate::store::json_store::JsonStore;
use crate::store::schema::SessionHistoryData;
use crate::ui::theme::Theme;

const ADVANCE_DELAY_STEP_MS: u64 = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Drill,
    Complete,
    Settings,
}

pub const SETTINGS_ITEMS: [&str; 9] = [
    "Repeat Mode",
    "Word Repeats",
    "List Rounds",
    "Dictation",
    "Typing Mode",
    "Speak Before Typing",
    "Speak After Typing",
    "Advance Delay",
    "Theme",
];

pub struct App {
    pub screen: AppScreen,
    pub drill: Drill,
    pub list: PracticeList,
    pub config: Config,
    pub theme: &'static Theme,
    pub store: Option<JsonStore>,
    pub history: SessionHistoryData,
    pub last_result: Option<SessionResult>,
    pub status: Option<String>,
    pub should_quit: bool,
    pub settings_selected: usize,
    /// Where settings are written on leaving the settings screen.
    pub config_path: Option<PathBuf>,
    pending_advance: Option<Instant>,
    speaker: Box<dyn Speaker>,
    recorded: bool,
}

impl App {
    pub fn new(
        config: Config,
        list: PracticeList,
        store: Option<JsonStore>,
        speaker: Box<dyn Speaker>,
    ) -> Self {
        let theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(theme));

        let history = store
            .as_ref()
            .map(JsonStore::load_history)
            .unwrap_or_default();

        let mut drill = Drill::new(list.units(config.typing_mode), config.repeat_state());
        drill.set_dictation(config.dictation_mode);
        tracing::info!(
            units = drill.progress().len(),
            repeat = config.repeat_mode.as_str(),
            typing_mode = config.typing_mode.as_str(),
            "session started"
        );

        Self {
            screen: AppScreen::Drill,
            drill,
            list,
            config,
            theme,
            store,
            history,
            last_result: None,
            status: None,
            should_quit: false,
            settings_selected: 0,
            config_path: None,
            pending_advance: None,
            speaker,
            recorded: false,
        }
    }

    /// Pronounce the first unit once the terminal is up.
    pub fn start(&mut self) {
        if self.config.auto_pronounce_before {
            self.speak_current();
        }
    }

    pub fn is_advance_pending(&self) -> bool {
        self.pending_advance.is_some()
    }

    pub fn type_char(&mut self, ch: char) {
        if self.pending_advance.is_some() {
            self.advance_now();
            if ch.is_whitespace() || self.drill.is_complete() {
                return;
            }
        } else if ch.is_whitespace() && self.drill.is_awaiting_advance() {
            self.advance_now();
            return;
        }
        let events = self.drill.submit_character(ch);
        self.handle_events(events);
    }

    pub fn backspace(&mut self) {
        self.pending_advance = None;
        let events = self.drill.request_backspace();
        self.handle_events(events);
    }

    pub fn skip(&mut self) {
        self.pending_advance = None;
        let events = self.drill.request_skip();
        self.handle_events(events);
    }

    pub fn jump_to_token(&mut self, token_index: usize) {
        let events = self.drill.request_jump_to(token_index);
        self.handle_events(events);
    }

    pub fn previous_unit(&mut self) {
        self.pending_advance = None;
        let events = self.drill.go_to_previous();
        self.handle_events(events);
    }

    pub fn next_unit(&mut self) {
        self.pending_advance = None;
        let events = self.drill.go_to_next();
        self.handle_events(events);
    }

    pub fn restart(&mut self) {
        self.pending_advance = None;
        self.recorded = false;
        self.last_result = None;
        self.status = None;
        self.screen = AppScreen::Drill;
        let events = self.drill.restart();
        self.handle_events(events);
    }

    pub fn toggle_dictation(&mut self) {
        self.config.dictation_mode = !self.config.dictation_mode;
        self.drill.set_dictation(self.config.dictation_mode);
    }

    pub fn toggle_typing_mode(&mut self) {
        self.config.typing_mode = self.config.typing_mode.toggle();
        self.reload_units();
        self.status = Some(format!("Typing mode: {}", self.config.typing_mode.as_str()));
    }

    fn reload_units(&mut self) {
        self.pending_advance = None;
        if self.drill.is_complete() {
            // The finished session is already in history; this is a new one.
            self.recorded = false;
        }
        let events = self
            .drill
            .replace_units(self.list.units(self.config.typing_mode));
        self.handle_events(events);
    }

    pub fn speak_current(&mut self) {
        let Some(text) = self.drill.current_unit().map(|u| u.raw_text.clone()) else {
            return;
        };
        if let Err(err) = self.speaker.speak(&text) {
            tracing::warn!(%err, "speech failed");
            self.status = Some(format!("Speech unavailable: {err}"));
        }
    }

    /// Fire the paced advance once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.pending_advance.is_some_and(|deadline| now >= deadline) {
            self.advance_now();
        }
    }

    fn schedule_advance(&mut self) {
        self.pending_advance =
            Some(Instant::now() + Duration::from_millis(self.config.advance_delay_ms));
    }

    fn advance_now(&mut self) {
        self.pending_advance = None;
        let events = self.drill.advance();
        self.handle_events(events);
    }

    fn handle_events(&mut self, events: Vec<DrillEvent>) {
        let mut advance_immediately = false;
        for event in events {
            match event {
                DrillEvent::UnitComplete { skipped: false } => {
                    if self.config.auto_pronounce_after {
                        self.speak_current();
                    }
                    if self.config.advance_delay_ms == 0 {
                        advance_immediately = true;
                    } else {
                        self.schedule_advance();
                    }
                }
                DrillEvent::UnitChanged(_) | DrillEvent::UnitRepeated { .. } => {
                    if self.config.auto_pronounce_before {
                        self.speak_current();
                    }
                }
                DrillEvent::ListRestarted { round, target } => {
                    self.status = Some(format!("Round {round}/{target}"));
                }
                DrillEvent::EditReopened(_) => {
                    self.pending_advance = None;
                }
                DrillEvent::SessionComplete => self.finish_session(),
                DrillEvent::CorrectCharacter(_)
                | DrillEvent::TokenComplete { .. }
                | DrillEvent::UnitComplete { skipped: true } => {}
            }
        }
        if advance_immediately {
            self.advance_now();
        }
    }

    fn finish_session(&mut self) {
        self.pending_advance = None;
        let result = SessionResult::from_drill(&self.drill, self.config.typing_mode, false);
        self.record(result);
        self.screen = AppScreen::Complete;
    }

    /// Save an unfinished session before exiting.
    pub fn quit(&mut self) {
        if !self.recorded && !self.drill.is_complete() {
            let result = SessionResult::from_drill(&self.drill, self.config.typing_mode, true);
            if !result.is_empty() {
                self.record(result);
            }
        }
        self.should_quit = true;
    }

    fn record(&mut self, result: SessionResult) {
        self.recorded = true;
        self.history.push(result.clone());
        if let Some(ref store) = self.store {
            if let Err(err) = store.save_history(&self.history) {
                tracing::error!(%err, "failed to save history");
                self.status = Some(format!("Could not save history: {err}"));
            }
        }
        self.last_result = Some(result);
    }

    pub fn go_to_settings(&mut self) {
        self.pending_advance = None;
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn leave_settings(&mut self) {
        if let Some(ref path) = self.config_path {
            if let Err(err) = self.config.save_to(path) {
                tracing::error!(%err, "failed to save config");
                self.status = Some(format!("Could not save settings: {err}"));
            }
        }
        self.screen = if self.drill.is_complete() {
            AppScreen::Complete
        } else {
            AppScreen::Drill
        };
        // The paced advance is held while in settings; start it over.
        if self.drill.is_awaiting_advance() {
            if self.config.advance_delay_ms == 0 {
                self.advance_now();
            } else {
                self.schedule_advance();
            }
        }
    }

    pub fn settings_value(&self, index: usize) -> String {
        let on_off = |b: bool| (if b { "On" } else { "Off" }).to_string();
        match index {
            0 => self.config.repeat_mode.as_str().to_string(),
            1 => self.config.word_repeat_target.to_string(),
            2 => self.config.list_repeat_target.to_string(),
            3 => on_off(self.config.dictation_mode),
            4 => self.config.typing_mode.as_str().to_string(),
            5 => on_off(self.config.auto_pronounce_before),
            6 => on_off(self.config.auto_pronounce_after),
            7 => format!("{} ms", self.config.advance_delay_ms),
            8 => self.config.theme.clone(),
            _ => String::new(),
        }
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_step(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_step(false);
    }

    fn settings_step(&mut self, forward: bool) {
        let step = |value: u32| {
            if forward {
                (value + 1).min(MAX_REPEAT_TARGET)
            } else {
                value.saturating_sub(1).max(1)
            }
        };
        match self.settings_selected {
            0 => {
                let mode = self.config.repeat_mode;
                self.config.repeat_mode = if forward {
                    mode.cycle()
                } else {
                    mode.cycle().cycle()
                };
                self.drill.set_repeat_mode(self.config.repeat_mode);
            }
            1 => {
                self.config.word_repeat_target = step(self.config.word_repeat_target);
                self.sync_repeat_targets();
            }
            2 => {
                self.config.list_repeat_target = step(self.config.list_repeat_target);
                self.sync_repeat_targets();
            }
            3 => self.toggle_dictation(),
            4 => {
                self.config.typing_mode = self.config.typing_mode.toggle();
                self.reload_units();
            }
            5 => self.config.auto_pronounce_before = !self.config.auto_pronounce_before,
            6 => self.config.auto_pronounce_after = !self.config.auto_pronounce_after,
            7 => {
                let delay = self.config.advance_delay_ms;
                self.config.advance_delay_ms = if forward {
                    (delay + ADVANCE_DELAY_STEP_MS).min(MAX_ADVANCE_DELAY_MS)
                } else {
                    delay.saturating_sub(ADVANCE_DELAY_STEP_MS)
                };
            }
            8 => self.cycle_theme(forward),
            _ => {}
        }
    }

    fn sync_repeat_targets(&mut self) {
        self.drill.set_repeat_targets(
            self.config.word_repeat_target,
            self.config.list_repeat_target,
        );
    }

    fn cycle_theme(&mut self, forward: bool) {
        let mut themes = Theme::available_themes();
        if themes.is_empty() {
            return;
        }
        themes.sort();
        let next = match themes.iter().position(|t| *t == self.config.theme) {
            Some(idx) if forward => (idx + 1) % themes.len(),
            Some(idx) => (idx + themes.len() - 1) % themes.len(),
            None => 0,
        };
        self.config.theme = themes[next].clone();
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            self.theme = Box::leak(Box::new(new_theme));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::repeat::RepeatMode;
    use crate::session::unit_list::TypingMode;
    use anyhow::Result;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl Speaker for Recorder {
        fn speak(&mut self, text: &str) -> Result<()> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn app_with(words: &[&str], config: Config) -> (App, Recorder) {
        let recorder = Recorder::default();
        let app = App::new(
            config,
            PracticeList::from_words(words.iter().copied()),
            None,
            Box::new(recorder.clone()),
        );
        (app, recorder)
    }

    fn type_str(app: &mut App, s: &str) {
        for ch in s.chars() {
            app.type_char(ch);
        }
    }

    #[test]
    fn test_completion_schedules_advance_and_tick_fires_it() {
        let (mut app, _) = app_with(&["cat", "dog"], Config::default());
        type_str(&mut app, "cat");
        assert!(app.is_advance_pending());
        assert_eq!(app.drill.progress().current_index(), 0);

        app.tick(Instant::now());
        assert!(app.is_advance_pending());
        app.tick(Instant::now() + Duration::from_millis(1500));
        assert!(!app.is_advance_pending());
        assert_eq!(app.drill.progress().current_index(), 1);
    }

    #[test]
    fn test_backspace_cancels_pending_advance() {
        let (mut app, _) = app_with(&["cat", "dog"], Config::default());
        type_str(&mut app, "cat");
        app.backspace();
        assert!(!app.is_advance_pending());
        assert!(!app.drill.is_awaiting_advance());
        app.tick(Instant::now() + Duration::from_secs(5));
        assert_eq!(app.drill.progress().current_index(), 0);
    }

    #[test]
    fn test_typing_during_delay_feeds_next_unit() {
        let (mut app, _) = app_with(&["cat", "dog"], Config::default());
        type_str(&mut app, "catd");
        assert_eq!(app.drill.progress().current_index(), 1);
        assert_eq!(app.drill.typing().cursor(), 1);
    }

    #[test]
    fn test_space_advances_immediately() {
        let (mut app, _) = app_with(&["cat", "dog"], Config::default());
        type_str(&mut app, "cat ");
        assert_eq!(app.drill.progress().current_index(), 1);
        assert_eq!(app.drill.typing().cursor(), 0);
    }

    #[test]
    fn test_zero_delay_advances_without_tick() {
        let config = Config {
            advance_delay_ms: 0,
            ..Config::default()
        };
        let (mut app, _) = app_with(&["cat", "dog"], config);
        type_str(&mut app, "cat");
        assert!(!app.is_advance_pending());
        assert_eq!(app.drill.progress().current_index(), 1);
    }

    #[test]
    fn test_pronounce_before_and_after() {
        let (mut app, spoken) = app_with(&["cat", "dog"], Config::default());
        app.start();
        type_str(&mut app, "cat ");
        assert_eq!(*spoken.0.borrow(), vec!["cat", "cat", "dog"]);
    }

    #[test]
    fn test_pronounce_disabled() {
        let config = Config {
            auto_pronounce_before: false,
            auto_pronounce_after: false,
            ..Config::default()
        };
        let (mut app, spoken) = app_with(&["cat", "dog"], config);
        app.start();
        type_str(&mut app, "cat ");
        assert!(spoken.0.borrow().is_empty());
        app.speak_current();
        assert_eq!(*spoken.0.borrow(), vec!["dog"]);
    }

    #[test]
    fn test_session_complete_records_result() {
        let (mut app, _) = app_with(&["a"], Config::default());
        type_str(&mut app, "a ");
        assert_eq!(app.screen, AppScreen::Complete);
        let result = app.last_result.as_ref().unwrap();
        assert!(!result.partial);
        assert_eq!(result.completed, 1);
        assert_eq!(app.history.sessions.len(), 1);

        app.quit();
        assert_eq!(app.history.sessions.len(), 1);
        assert!(app.should_quit);
    }

    #[test]
    fn test_quit_mid_session_saves_partial() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut app = App::new(
            Config::default(),
            PracticeList::from_words(["cat", "dog"]),
            Some(store),
            Box::new(Recorder::default()),
        );
        type_str(&mut app, "ca");
        app.quit();

        let reloaded = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let history = reloaded.load_history();
        assert_eq!(history.sessions.len(), 1);
        assert!(history.sessions[0].partial);
    }

    #[test]
    fn test_quit_without_input_saves_nothing() {
        let (mut app, _) = app_with(&["cat"], Config::default());
        app.quit();
        assert!(app.history.sessions.is_empty());
    }

    #[test]
    fn test_restart_after_completion() {
        let (mut app, _) = app_with(&["a"], Config::default());
        type_str(&mut app, "a ");
        app.restart();
        assert_eq!(app.screen, AppScreen::Drill);
        assert!(!app.drill.is_complete());
        assert!(app.last_result.is_none());
    }

    #[test]
    fn test_typing_mode_toggle_swaps_units() {
        let mut list = PracticeList::from_words(["ran", "went"]);
        list.base_forms.insert("ran".into(), "run".into());
        list.base_forms.insert("went".into(), "go".into());
        let mut app = App::new(
            Config::default(),
            list,
            None,
            Box::new(Recorder::default()),
        );
        app.next_unit();
        app.toggle_typing_mode();
        assert_eq!(app.config.typing_mode, TypingMode::BaseForm);
        assert_eq!(app.drill.progress().current_index(), 0);
        assert_eq!(app.drill.current_unit().unwrap().raw_text, "run");
    }

    #[test]
    fn test_settings_change_repeat_mode_live() {
        let (mut app, _) = app_with(&["a", "b"], Config::default());
        app.go_to_settings();
        app.settings_cycle_forward();
        assert_eq!(app.config.repeat_mode, RepeatMode::Word);
        assert_eq!(app.drill.repeat().mode, RepeatMode::Word);
        app.settings_cycle_backward();
        assert_eq!(app.config.repeat_mode, RepeatMode::None);

        app.settings_selected = 1;
        app.settings_cycle_backward();
        app.settings_cycle_backward();
        app.settings_cycle_backward();
        assert_eq!(app.config.word_repeat_target, 1);
        assert_eq!(app.drill.repeat().word_repeat_target, 1);

        app.leave_settings();
        assert_eq!(app.screen, AppScreen::Drill);
    }

    #[test]
    fn test_leave_settings_saves_config() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app_with(&["a"], Config::default());
        let path = dir.path().join("config.toml");
        app.config_path = Some(path.clone());
        app.go_to_settings();
        app.settings_selected = 3;
        app.settings_cycle_forward();
        app.leave_settings();

        let saved = Config::load_from(&path).unwrap();
        assert!(saved.dictation_mode);
        assert!(app.drill.dictation());
    }

    #[test]
    fn test_settings_round_trip_keeps_paced_advance() {
        let (mut app, _) = app_with(&["cat", "dog"], Config::default());
        type_str(&mut app, "cat");
        app.go_to_settings();
        app.tick(Instant::now() + Duration::from_secs(10));
        assert_eq!(app.drill.progress().current_index(), 0);

        app.leave_settings();
        assert!(app.is_advance_pending());
        app.tick(Instant::now() + Duration::from_secs(10));
        assert_eq!(app.drill.progress().current_index(), 1);

        app.type_char('d');
        assert_eq!(app.drill.typing().cursor(), 1);
    }

    #[test]
    fn test_letter_after_settings_round_trip_reaches_next_unit() {
        let (mut app, _) = app_with(&["cat", "dog"], Config::default());
        type_str(&mut app, "cat");
        app.go_to_settings();
        app.leave_settings();
        app.type_char('d');
        assert_eq!(app.drill.progress().current_index(), 1);
        assert_eq!(app.drill.typing().cursor(), 1);
    }

    #[test]
    fn test_typing_mode_switch_after_completion_records_fresh_session() {
        let config = Config {
            advance_delay_ms: 0,
            ..Config::default()
        };
        let (mut app, _) = app_with(&["cat"], config);
        type_str(&mut app, "cat");
        assert_eq!(app.screen, AppScreen::Complete);

        app.go_to_settings();
        app.settings_selected = 4;
        app.settings_cycle_forward();
        app.leave_settings();
        assert_eq!(app.screen, AppScreen::Drill);

        type_str(&mut app, "cat");
        assert_eq!(app.history.sessions.len(), 2);
        let second = app.last_result.as_ref().unwrap();
        assert_eq!(second.keystrokes, 3);
        assert_eq!(second.completed, 1);
    }

    #[test]
    fn test_advance_delay_setting_bounds() {
        let (mut app, _) = app_with(&["a"], Config::default());
        app.settings_selected = 7;
        for _ in 0..10 {
            app.settings_cycle_backward();
        }
        assert_eq!(app.config.advance_delay_ms, 0);
        for _ in 0..40 {
            app.settings_cycle_forward();
        }
        assert_eq!(app.config.advance_delay_ms, MAX_ADVANCE_DELAY_MS);
    }
}
