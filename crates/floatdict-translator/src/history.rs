use std::path::Path;

use floatdict_types::CaptureMode;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheKey, unix_now};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub key: CacheKey,
    /// Unix seconds of the latest lookup
    pub looked_up_at: u64,
}

impl HistoryEntry {
    pub fn word(&self) -> &str {
        &self.key.word
    }

    pub fn mode(&self) -> CaptureMode {
        self.key.mode
    }
}

/// Recent lookups, oldest first. A repeated lookup moves to the end.
#[derive(Debug)]
pub struct LookupHistory {
    entries: Vec<HistoryEntry>,
    max_entries: usize,
}

impl LookupHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(&mut self, key: CacheKey) {
        self.record_at(key, unix_now());
    }

    fn record_at(&mut self, key: CacheKey, looked_up_at: u64) {
        self.entries.retain(|e| e.key != key);
        self.entries.push(HistoryEntry { key, looked_up_at });
        self.trim();
    }

    fn trim(&mut self) {
        let excess = self.entries.len().saturating_sub(self.max_entries);
        self.entries.drain(..excess);
    }

    /// Newest first; `query` filters by case-insensitive substring of the word
    pub fn recent(&self, query: Option<&str>) -> Vec<&HistoryEntry> {
        let needle = query.map(str::to_lowercase);
        self.entries
            .iter()
            .rev()
            .filter(|e| {
                needle
                    .as_deref()
                    .is_none_or(|n| e.key.word.to_lowercase().contains(n))
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Reads a history written by [`LookupHistory::save`]; a missing or
    /// unreadable file yields an empty history
    pub fn load(path: &Path, max_entries: usize) -> Self {
        let mut history = Self::new(max_entries);

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return history,
            Err(e) => {
                tracing::warn!("Failed to read history {}: {}", path.display(), e);
                return history;
            }
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&content) {
            Ok(entries) => {
                for entry in entries {
                    history.record_at(entry.key, entry.looked_up_at);
                }
                tracing::debug!("Loaded {} history entries from {}", history.len(), path.display());
            }
            Err(e) => tracing::warn!("Ignoring corrupt history {}: {}", path.display(), e),
        }
        history
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
