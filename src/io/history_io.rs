use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::io::atomic_write;
use crate::util::unicode::take_chars;

pub const HISTORY_FILE: &str = "history.json";

/// Entries kept; older ones are dropped on save
pub const MAX_HISTORY: usize = 10;

/// Stored prefix of the source text, in code points
pub const CONTENT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize history: {0}")]
    Json(#[from] serde_json::Error),
}

/// One generated thread, most recent first in the history file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Milliseconds since the epoch at save time
    pub id: i64,
    pub content: String,
    pub posts: Vec<String>,
    pub created_at: DateTime<Utc>,
}

pub fn history_path(dir: &Path) -> PathBuf {
    dir.join(HISTORY_FILE)
}

/// Read the history. Missing or unreadable history is empty.
pub fn load_history(dir: &Path) -> Vec<HistoryEntry> {
    let path = history_path(dir);
    let Ok(content) = fs::read_to_string(&path) else {
        return Vec::new();
    };
    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not parse history, ignoring it");
            Vec::new()
        }
    }
}

/// Record a generated thread at the front of the history.
pub fn save_history(
    dir: &Path,
    content: &str,
    posts: Vec<String>,
) -> Result<HistoryEntry, HistoryError> {
    save_history_at(dir, content, posts, Utc::now())
}

fn save_history_at(
    dir: &Path,
    content: &str,
    posts: Vec<String>,
    now: DateTime<Utc>,
) -> Result<HistoryEntry, HistoryError> {
    let entry = HistoryEntry {
        id: now.timestamp_millis(),
        content: take_chars(content, CONTENT_PREVIEW_CHARS).to_string(),
        posts,
        created_at: now,
    };

    let mut history = load_history(dir);
    history.insert(0, entry.clone());
    history.truncate(MAX_HISTORY);

    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(&history)?;
    atomic_write(&history_path(dir), json.as_bytes())?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_empty_history() {
        let tmp = TempDir::new().unwrap();
        assert!(load_history(tmp.path()).is_empty());
    }

    #[test]
    fn test_save_prepends() {
        let tmp = TempDir::new().unwrap();
        save_history_at(tmp.path(), "first", vec!["a".into()], at(0)).unwrap();
        save_history_at(tmp.path(), "second", vec!["b".into()], at(1)).unwrap();

        let history = load_history(tmp.path());
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "second");
        assert_eq!(history[1].content, "first");
        assert_eq!(history[0].id, at(1).timestamp_millis());
    }

    #[test]
    fn test_history_is_capped() {
        let tmp = TempDir::new().unwrap();
        for i in 0..12 {
            save_history_at(tmp.path(), &format!("entry {}", i), Vec::new(), at(i)).unwrap();
        }
        let history = load_history(tmp.path());
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history[0].content, "entry 11");
        assert_eq!(history[9].content, "entry 2");
    }

    #[test]
    fn test_content_is_truncated_by_code_points() {
        let tmp = TempDir::new().unwrap();
        let long = "あ".repeat(250);
        let entry = save_history(tmp.path(), &long, Vec::new()).unwrap();
        assert_eq!(entry.content.chars().count(), CONTENT_PREVIEW_CHARS);
    }

    #[test]
    fn test_corrupt_history_reads_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(history_path(tmp.path()), "{not json").unwrap();
        assert!(load_history(tmp.path()).is_empty());
        // and saving over it recovers
        save_history(tmp.path(), "fresh", Vec::new()).unwrap();
        assert_eq!(load_history(tmp.path()).len(), 1);
    }

    #[test]
    fn test_serialized_field_names() {
        let entry = HistoryEntry {
            id: 1,
            content: "c".into(),
            posts: vec!["p".into()],
            created_at: at(0),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("createdAt").is_some());
    }
}
