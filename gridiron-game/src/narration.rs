//! Append-only narration log kept alongside the career.
use serde::{Deserialize, Serialize};

/// Ordered narration entries, one per simulation action.
///
/// Entries are only ever appended by the engine. [`NarrationLog::clear`]
/// exists for an explicit external request and is never called internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct NarrationLog {
    entries: Vec<String>,
}

impl NarrationLog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append one entry built from `lines`. Empty blocks are skipped.
    pub fn push_block<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return;
        }
        self.entries.push(lines.join("\n"));
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Whole log as plain text, one entry after another.
    #[must_use]
    pub fn export_text(&self) -> String {
        self.entries.join("\n")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
