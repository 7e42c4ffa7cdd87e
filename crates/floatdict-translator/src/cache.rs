use std::collections::HashMap;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use floatdict_types::{CaptureMode, TranslationResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub word: String,
    /// Sentence lookups skip word-only sources, so the two never share an entry
    pub mode: CaptureMode,
    pub from: String,
    pub to: String,
}

impl CacheKey {
    pub fn new(word: &str, mode: CaptureMode, from: &str, to: &str) -> Self {
        Self {
            word: word.to_string(),
            mode,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResult {
    key: CacheKey,
    result: TranslationResult,
    /// Unix seconds
    stored_at: u64,
    #[serde(skip)]
    seq: u64,
}

/// Bounded lookup cache; the least recently stored entry is evicted first
#[derive(Debug)]
pub struct TranslationCache {
    entries: HashMap<CacheKey, CachedResult>,
    max_entries: usize,
    next_seq: u64,
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl TranslationCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: max_entries.max(1),
            next_seq: 0,
        }
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

    pub fn get(&self, key: &CacheKey) -> Option<&TranslationResult> {
        self.entries.get(key).map(|c| &c.result)
    }

    pub fn insert(&mut self, key: CacheKey, result: TranslationResult) {
        self.store(key, result, unix_now());
        self.evict();
    }

    fn store(&mut self, key: CacheKey, result: TranslationResult, stored_at: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key.clone(),
            CachedResult {
                key,
                result,
                stored_at,
                seq,
            },
        );
    }

    fn evict(&mut self) {
        while self.entries.len() > self.max_entries {
            let Some(oldest) = self
                .entries
                .values()
                .min_by_key(|c| c.seq)
                .map(|c| c.key.clone())
            else {
                break;
            };
            tracing::trace!("Evicting cached lookup '{}'", oldest.word);
            self.entries.remove(&oldest);
        }
    }

    fn ordered(&self) -> Vec<&CachedResult> {
        let mut items: Vec<_> = self.entries.values().collect();
        items.sort_by_key(|c| c.seq);
        items
    }

    /// Reads a cache written by [`TranslationCache::save`]; a missing or unreadable
    /// file yields an empty cache
    pub fn load(path: &Path, max_entries: usize) -> Self {
        let mut cache = Self::new(max_entries);

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return cache,
            Err(e) => {
                tracing::warn!("Failed to read cache {}: {}", path.display(), e);
                return cache;
            }
        };

        let mut items: Vec<CachedResult> = match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Ignoring corrupt cache {}: {}", path.display(), e);
                return cache;
            }
        };

        // File order is oldest first; keep it stable across equal timestamps
        items.sort_by_key(|c| c.stored_at);
        for item in items {
            cache.store(item.key, item.result, item.stored_at);
        }
        cache.evict();

        tracing::info!("Loaded {} cached lookups from {}", cache.len(), path.display());
        cache
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.ordered()).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        tracing::debug!("Saved {} cached lookups to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(query: &str) -> TranslationResult {
        TranslationResult {
            query: query.to_string(),
            mode: CaptureMode::Word,
            source_lang: "en".to_string(),
            detected_lang: Some("en".to_string()),
            target_lang: "th".to_string(),
            entries: Vec::new(),
            failures: Vec::new(),
            consulted: vec!["Google Translate".to_string()],
        }
    }

    fn key(word: &str) -> CacheKey {
        CacheKey::new(word, CaptureMode::Word, "en", "th")
    }

    #[test]
    fn test_key_includes_languages() {
        let mut cache = TranslationCache::new(10);
        cache.insert(key("cat"), result("cat"));
        assert!(cache.get(&key("cat")).is_some());
        assert!(cache.get(&CacheKey::new("cat", CaptureMode::Word, "en", "ja")).is_none());
    }

    #[test]
    fn test_key_includes_mode() {
        let mut cache = TranslationCache::new(10);
        cache.insert(
            CacheKey::new("run", CaptureMode::Sentence, "en", "th"),
            result("run"),
        );
        assert!(cache.get(&key("run")).is_none());
    }

    #[test]
    fn test_oldest_entry_is_evicted() {
        let mut cache = TranslationCache::new(2);
        cache.insert(key("a"), result("a"));
        cache.insert(key("b"), result("b"));
        cache.insert(key("c"), result("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key("a")).is_none());
        assert!(cache.get(&key("b")).is_some());
        assert!(cache.get(&key("c")).is_some());
    }

    #[test]
    fn test_restoring_refreshes_age() {
        let mut cache = TranslationCache::new(2);
        cache.insert(key("a"), result("a"));
        cache.insert(key("b"), result("b"));
        cache.insert(key("a"), result("a"));
        cache.insert(key("c"), result("c"));

        assert!(cache.get(&key("a")).is_some());
        assert!(cache.get(&key("b")).is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let mut cache = TranslationCache::new(10);
        cache.insert(key("a"), result("a"));
        cache.insert(key("b"), result("b"));
        cache.save(&path).unwrap();

        let loaded = TranslationCache::load(&path, 1);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(&key("b")).unwrap().query, "b");

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"mode\": \"Word\""));
    }

    #[test]
    fn test_corrupt_or_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = TranslationCache::load(&dir.path().join("none.json"), 10);
        assert!(missing.is_empty());

        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(TranslationCache::load(&path, 10).is_empty());
    }
}
