//! Visible terminal transcript.
//!
//! The transcript is append-only: entries are never edited or removed one by
//! one, the whole sequence can only be reset.

use serde::{Deserialize, Serialize};

/// Kind of a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Text the user submitted.
    Command,
    /// Output produced locally or by the assistant.
    Response,
    /// A failure reported to the user.
    Error,
}

/// One line of the visible terminal transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: EntryKind,
    pub content: String,
}

impl HistoryEntry {
    pub fn command(content: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Command,
            content: content.into(),
        }
    }

    pub fn response(content: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Response,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Error,
            content: content.into(),
        }
    }
}

/// Ordered, append-only sequence of [`HistoryEntry`] values owned by one
/// terminal instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<HistoryEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transcript whose first line is the given response.
    pub fn with_banner(banner: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::response(banner)],
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn push_command(&mut self, content: impl Into<String>) {
        self.push(HistoryEntry::command(content));
    }

    pub fn push_response(&mut self, content: impl Into<String>) {
        self.push(HistoryEntry::response(content));
    }

    pub fn push_error(&mut self, content: impl Into<String>) {
        self.push(HistoryEntry::error(content));
    }

    /// Replaces the whole transcript with a single response notice.
    pub fn reset(&mut self, notice: impl Into<String>) {
        self.entries.clear();
        self.entries.push(HistoryEntry::response(notice));
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Contents of all command entries, in submission order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::Command)
            .map(|entry| entry.content.as_str())
    }

    /// Entries appended at or after `index`.
    pub fn since(&self, index: usize) -> &[HistoryEntry] {
        self.entries.get(index..).unwrap_or(&[])
    }
}
