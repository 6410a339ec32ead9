use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a log entry should be presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

/// A human-readable event of a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub severity: Severity,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[Round {}] {}", self.round, self.message)
    }
}

/// The event stream of a match, oldest entry first.
///
/// The engine only ever appends to it; it is meant for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<LogEntry>,
}

impl History {
    pub fn push(&mut self, round: u32, severity: Severity, message: String) {
        debug!(round, ?severity, "{}", message);
        self.entries.push(LogEntry {
            round,
            severity,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The entries added since the first `seen` ones.
    pub fn since(&self, seen: usize) -> &[LogEntry] {
        &self.entries[seen.min(self.entries.len())..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
