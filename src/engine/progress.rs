use crate::engine::repeat::Transition;
use crate::engine::unit::{PracticeUnit, units_from_texts};

/// Position within the practice list. `current == units.len()` means the
/// session is complete.
#[derive(Clone, Debug)]
pub struct SessionProgress {
    units: Vec<PracticeUnit>,
    current: usize,
    pub dictation: bool,
}

impl SessionProgress {
    /// An empty list is replaced by a single placeholder unit.
    pub fn new(mut units: Vec<PracticeUnit>) -> Self {
        units.retain(PracticeUnit::has_typable_text);
        let units = if units.is_empty() {
            vec![PracticeUnit::placeholder()]
        } else {
            units
        };
        Self {
            units,
            current: 0,
            dictation: false,
        }
    }

    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        Self::new(units_from_texts(texts))
    }

    pub fn units(&self) -> &[PracticeUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_unit(&self) -> Option<&PracticeUnit> {
        self.units.get(self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.units.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.units.len()
    }

    pub fn progress_fraction(&self) -> f64 {
        (self.current as f64 / self.units.len() as f64).clamp(0.0, 1.0)
    }

    /// Apply the repeat scheduler's decision.
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::RepeatUnit => {}
            Transition::NextUnit => self.current = (self.current + 1).min(self.units.len()),
            Transition::RestartList => self.current = 0,
            Transition::Complete => self.current = self.units.len(),
        }
    }

    /// Manual navigation; does not consult the repeat scheduler.
    pub fn go_to_previous(&mut self) -> bool {
        if self.is_complete() || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn go_to_next(&mut self) -> bool {
        if self.current + 1 >= self.units.len() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn restart(&mut self) {
        self.current = 0;
    }

    /// Swap the whole list (typing mode switch) and start over.
    pub fn replace_units(&mut self, units: Vec<PracticeUnit>) {
        let dictation = self.dictation;
        *self = Self::new(units);
        self.dictation = dictation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(words: &[&str]) -> SessionProgress {
        SessionProgress::from_texts(words)
    }

    #[test]
    fn test_fraction_and_completion() {
        let mut p = progress(&["a", "b", "c", "d"]);
        assert_eq!(p.progress_fraction(), 0.0);
        p.apply(Transition::NextUnit);
        assert_eq!(p.progress_fraction(), 0.25);
        p.apply(Transition::Complete);
        assert!(p.is_complete());
        assert_eq!(p.progress_fraction(), 1.0);
        assert!(p.current_unit().is_none());
    }

    #[test]
    fn test_manual_navigation_bounds() {
        let mut p = progress(&["a", "b"]);
        assert!(!p.go_to_previous());
        assert!(p.go_to_next());
        assert_eq!(p.current_index(), 1);
        assert!(!p.go_to_next());
        assert!(p.go_to_previous());
        assert_eq!(p.current_index(), 0);
    }

    #[test]
    fn test_navigation_refused_after_completion() {
        let mut p = progress(&["a", "b"]);
        p.apply(Transition::Complete);
        assert!(!p.go_to_previous());
        assert!(!p.go_to_next());
    }

    #[test]
    fn test_restart_list_and_repeat_unit() {
        let mut p = progress(&["a", "b"]);
        p.apply(Transition::NextUnit);
        p.apply(Transition::RepeatUnit);
        assert_eq!(p.current_index(), 1);
        p.apply(Transition::RestartList);
        assert_eq!(p.current_index(), 0);
    }

    #[test]
    fn test_empty_list_uses_placeholder() {
        let p = SessionProgress::new(Vec::new());
        assert_eq!(p.len(), 1);
        assert!(!p.is_complete());
    }

    #[test]
    fn test_replace_units_keeps_dictation() {
        let mut p = progress(&["a", "b"]);
        p.dictation = true;
        p.apply(Transition::NextUnit);
        p.replace_units(vec![PracticeUnit::new("z")]);
        assert_eq!(p.current_index(), 0);
        assert_eq!(p.len(), 1);
        assert!(p.dictation);
    }
}
