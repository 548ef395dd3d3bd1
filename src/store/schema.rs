use serde::{Deserialize, Serialize};

use crate::session::result::SessionResult;

const SCHEMA_VERSION: u32 = 1;

/// Oldest entries are dropped past this many sessions.
pub const MAX_HISTORY: usize = 500;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionHistoryData {
    pub schema_version: u32,
    pub sessions: Vec<SessionResult>,
}

impl Default for SessionHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            sessions: Vec::new(),
        }
    }
}

impl SessionHistoryData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn push(&mut self, result: SessionResult) {
        self.sessions.push(result);
        if self.sessions.len() > MAX_HISTORY {
            let excess = self.sessions.len() - MAX_HISTORY;
            self.sessions.drain(..excess);
        }
    }

    pub fn best_wpm(&self) -> Option<f64> {
        self.sessions
            .iter()
            .filter(|s| !s.partial)
            .map(|s| s.wpm)
            .reduce(f64::max)
    }
}
