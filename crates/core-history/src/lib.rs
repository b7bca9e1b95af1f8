//! Command history: deduplicated in-memory log with browse cursor, prefix
//! navigation, substring search and inline suggestions, backed by an
//! append-only file.
//!
//! The browse cursor `pos` ranges over `0..=len`; `pos == len` means "not
//! browsing" (fresh line). Navigation clamps at both ends and never errors.
//! Persistence is best-effort: file failures are logged and the session keeps
//! going with in-memory history only.

pub mod file;

use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

pub const DEFAULT_MAX_SIZE: usize = 1000;
pub const HISTORY_FILE_NAME: &str = ".dsh_history";
/// Maximum results returned by [`History::search`].
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct History {
    items: Vec<String>,
    pos: usize,
    max_size: usize,
    path: Option<PathBuf>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

/// `<home>/.dsh_history`.
pub fn default_path(home: &Path) -> PathBuf {
    home.join(HISTORY_FILE_NAME)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut chars = text.chars();
    prefix.chars().all(|p| {
        chars
            .next()
            .is_some_and(|c| c.to_lowercase().eq(p.to_lowercase()))
    })
}

impl History {
    /// In-memory history with no backing file.
    pub fn new(max_size: usize) -> Self {
        Self {
            items: Vec::new(),
            pos: 0,
            max_size: max_size.max(1),
            path: None,
        }
    }

    /// History backed by `path`, loading whatever the file already holds.
    pub fn with_file<P: Into<PathBuf>>(path: P, max_size: usize) -> Self {
        let mut history = Self::new(max_size);
        history.path = Some(path.into());
        history.load();
        history
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries oldest first.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_browsing(&self) -> bool {
        self.pos < self.items.len()
    }

    /// Back to "not browsing".
    pub fn reset_position(&mut self) {
        self.pos = self.items.len();
    }

    /// Record an accepted line and append it to the history file.
    pub fn add(&mut self, line: &str) {
        let Some(entry) = self.push_entry(line) else {
            return;
        };
        self.reset_position();
        if let Some(path) = &self.path {
            match file::append_record(path, &entry) {
                Ok(()) => trace!(target: "history.io", len = self.items.len(), "history_appended"),
                Err(e) => {
                    warn!(target: "history.io", path = %path.display(), ?e, "history_append_failed")
                }
            }
        }
    }

    /// In-memory insert: trim, skip blanks and comments, move duplicates to
    /// the newest slot, truncate from the front. Returns the stored entry.
    fn push_entry(&mut self, line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        if let Some(idx) = self.items.iter().rposition(|s| s == trimmed) {
            self.items.remove(idx);
        }
        self.items.push(trimmed.to_string());
        if self.items.len() > self.max_size {
            let excess = self.items.len() - self.max_size;
            self.items.drain(..excess);
        }
        Some(trimmed.to_string())
    }

    fn load(&mut self) {
        let Some(path) = self.path.clone() else {
            return;
        };
        match file::load_entries(&path) {
            Ok(entries) => {
                self.items.clear();
                for e in &entries {
                    self.push_entry(e);
                }
                debug!(target: "history.io", records = entries.len(), len = self.items.len(), "history_loaded");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(target: "history.io", path = %path.display(), "history_file_absent");
            }
            Err(e) => warn!(target: "history.io", path = %path.display(), ?e, "history_load_failed"),
        }
        self.reset_position();
    }

    /// Re-read the file to pick up other sessions' appends. The browse cursor
    /// stays on the entry it pointed at; if that entry is gone it keeps the
    /// same distance from the newest entry.
    pub fn reload(&mut self) {
        let current = self.items.get(self.pos).cloned();
        let from_end = self.items.len() - self.pos;
        self.load();
        self.pos = current
            .and_then(|c| self.items.iter().rposition(|s| *s == c))
            .unwrap_or_else(|| self.items.len().saturating_sub(from_end));
    }

    /// Step to the older entry; at the oldest entry keep returning it.
    pub fn previous(&mut self) -> Option<&str> {
        if self.items.is_empty() {
            return None;
        }
        self.pos = self.pos.saturating_sub(1);
        self.items.get(self.pos).map(String::as_str)
    }

    /// Step to the newer entry; `None` once past the newest (fresh line).
    pub fn next_entry(&mut self) -> Option<&str> {
        if self.pos < self.items.len() {
            self.pos += 1;
        }
        self.items.get(self.pos).map(String::as_str)
    }

    /// Nearest older entry starting with `prefix`. Without an older match the
    /// cursor stays put and the current entry is returned if it matches, so an
    /// empty prefix behaves like [`History::previous`].
    pub fn previous_with_prefix(&mut self, prefix: &str) -> Option<&str> {
        let found = (0..self.pos)
            .rev()
            .find(|&i| self.items[i].starts_with(prefix));
        if let Some(idx) = found {
            self.pos = idx;
            return Some(&self.items[idx]);
        }
        self.items
            .get(self.pos)
            .filter(|s| s.starts_with(prefix))
            .map(String::as_str)
    }

    /// Nearest newer entry starting with `prefix`; on no match the cursor
    /// returns to "not browsing".
    pub fn next_with_prefix(&mut self, prefix: &str) -> Option<&str> {
        let found = (self.pos + 1..self.items.len()).find(|&i| self.items[i].starts_with(prefix));
        match found {
            Some(idx) => {
                self.pos = idx;
                Some(&self.items[idx])
            }
            None => {
                self.reset_position();
                None
            }
        }
    }

    /// Case-insensitive substring matches, newest first, at most
    /// [`SEARCH_LIMIT`].
    pub fn search(&self, query: &str) -> Vec<&str> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .rev()
            .filter(|s| s.to_lowercase().contains(&needle))
            .take(SEARCH_LIMIT)
            .map(String::as_str)
            .collect()
    }

    /// Remainder of the newest entry that case-insensitively extends `input`.
    pub fn suggestion(&self, input: &str) -> Option<String> {
        if input.is_empty() {
            return None;
        }
        let typed = input.chars().count();
        self.items
            .iter()
            .rev()
            .find(|s| s.chars().count() > typed && starts_with_ignore_case(s, input))
            .map(|s| s.chars().skip(typed).collect())
    }
}
