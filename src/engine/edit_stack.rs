/// A completed token inside the current practice unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditEntry {
    pub token_index: usize,
    pub text: String,
}

/// Completed tokens in typing order. While typing forward its length equals
/// the index of the current token.
#[derive(Clone, Debug, Default)]
pub struct EditStack {
    entries: Vec<EditEntry>,
}

impl EditStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token_index: usize, text: impl Into<String>) {
        self.entries.push(EditEntry {
            token_index,
            text: text.into(),
        });
    }

    /// Remove and return the most recent entry. Empty stack is a no-op.
    pub fn pop_to_previous(&mut self) -> Option<EditEntry> {
        self.entries.pop()
    }

    /// Reopen the entry for `token_index`, discarding every entry typed after
    /// it. Returns `None` and leaves the stack untouched if no such entry exists.
    pub fn jump_to(&mut self, token_index: usize) -> Option<EditEntry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.token_index == token_index)?;
        self.entries.truncate(pos + 1);
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&EditEntry> {
        self.entries.last()
    }

    pub fn get(&self, token_index: usize) -> Option<&EditEntry> {
        self.entries.iter().find(|e| e.token_index == token_index)
    }

    pub fn entries(&self) -> &[EditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_then_pop_round_trips() {
        let mut stack = EditStack::new();
        stack.push(0, "hello");
        let entry = stack.pop_to_previous().unwrap();
        assert_eq!(entry.token_index, 0);
        assert_eq!(entry.text, "hello");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let mut stack = EditStack::new();
        assert!(stack.pop_to_previous().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_returns_most_recent_first() {
        let mut stack = EditStack::new();
        stack.push(0, "I");
        stack.push(1, "am");
        assert_eq!(stack.pop_to_previous().unwrap().text, "am");
        assert_eq!(stack.pop_to_previous().unwrap().text, "I");
    }

    #[test]
    fn test_jump_discards_later_entries() {
        let mut stack = EditStack::new();
        stack.push(0, "I");
        stack.push(1, "am");
        stack.push(2, "very");
        let entry = stack.jump_to(1).unwrap();
        assert_eq!(entry.token_index, 1);
        assert_eq!(entry.text, "am");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.last().unwrap().text, "I");
    }

    #[test]
    fn test_jump_to_last_behaves_like_pop() {
        let mut stack = EditStack::new();
        stack.push(0, "a");
        stack.push(1, "b");
        assert_eq!(stack.jump_to(1).unwrap().text, "b");
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_jump_to_unknown_index_keeps_stack() {
        let mut stack = EditStack::new();
        stack.push(0, "a");
        assert!(stack.jump_to(4).is_none());
        assert_eq!(stack.len(), 1);
    }
}
