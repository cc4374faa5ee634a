// src/history.rs
//! Activity log: a capped, newest-first list of what the user produced.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Entries kept on disk.
pub const MAX_ENTRIES: usize = 100;
/// Preview length before truncation, in characters.
pub const PREVIEW_CHARS: usize = 180;

const HISTORY_FILE: &str = "activity_log.json";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    Note,
    Chat,
    Image,
    Tts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub title: String,
    pub preview: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Counts per entry kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total: usize,
    pub notes: usize,
    pub chats: usize,
    pub images: usize,
    pub tts: usize,
}

/// Cut `text` to [`PREVIEW_CHARS`] characters, marking the cut with `...`.
pub fn preview_of(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// JSON file backed log.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(HISTORY_FILE))
    }

    /// All entries, newest first. A missing or corrupt log reads as empty.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring corrupt history {}: {}", self.path.display(), e);
            Vec::new()
        })
    }

    /// Prepend an entry and trim the log to [`MAX_ENTRIES`].
    pub fn record(&self, kind: EntryKind, title: &str, text: &str) -> Result<HistoryEntry, HistoryError> {
        let timestamp = now_millis();
        let entry = HistoryEntry {
            id: timestamp.to_string(),
            kind,
            title: title.to_string(),
            preview: preview_of(text),
            timestamp,
        };

        let mut entries = self.entries();
        entries.insert(0, entry.clone());
        entries.truncate(MAX_ENTRIES);
        self.write(&entries)?;
        tracing::debug!(kind = ?kind, "history entry recorded");
        Ok(entry)
    }

    pub fn clear(&self) -> Result<(), HistoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn stats(&self) -> HistoryStats {
        let entries = self.entries();
        let count = |k: EntryKind| entries.iter().filter(|e| e.kind == k).count();
        HistoryStats {
            total: entries.len(),
            notes: count(EntryKind::Note),
            chats: count(EntryKind::Chat),
            images: count(EntryKind::Image),
            tts: count(EntryKind::Tts),
        }
    }

    fn write(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(entries)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncation() {
        assert_eq!(preview_of("short"), "short");
        let exact = "a".repeat(PREVIEW_CHARS);
        assert_eq!(preview_of(&exact), exact);
        let long = "é".repeat(PREVIEW_CHARS + 1);
        let preview = preview_of(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_record_newest_first_and_capped() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::in_dir(dir.path());
        for i in 0..(MAX_ENTRIES + 5) {
            log.record(EntryKind::Tts, "Speech: Kore", &format!("text {}", i)).unwrap();
        }
        let entries = log.entries();
        assert_eq!(entries.len(), MAX_ENTRIES);
        assert_eq!(entries[0].preview, format!("text {}", MAX_ENTRIES + 4));
        assert_eq!(entries[0].kind, EntryKind::Tts);
    }

    #[test]
    fn test_stats_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::in_dir(dir.path());
        log.record(EntryKind::Tts, "Speech: Puck", "a").unwrap();
        log.record(EntryKind::Note, "Note", "b").unwrap();
        log.record(EntryKind::Tts, "Speech: Kore", "c").unwrap();

        let stats = log.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.tts, 2);
        assert_eq!(stats.notes, 1);
        assert_eq!(stats.chats, 0);

        log.clear().unwrap();
        assert!(log.entries().is_empty());
        log.clear().unwrap();
    }

    #[test]
    fn test_serialized_type_tag() {
        let entry = HistoryEntry {
            id: "1".into(),
            kind: EntryKind::Tts,
            title: "Speech: Kore".into(),
            preview: "hi".into(),
            timestamp: 1,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "TTS");
    }

    #[test]
    fn test_corrupt_log_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::in_dir(dir.path());
        fs::write(dir.path().join(HISTORY_FILE), "[{").unwrap();
        assert!(log.entries().is_empty());
        log.record(EntryKind::Chat, "Chat", "x").unwrap();
        assert_eq!(log.entries().len(), 1);
    }
}
