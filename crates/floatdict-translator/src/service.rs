use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use floatdict_config::cache::CacheConfig;
use floatdict_config::history::HistoryConfig;
use floatdict_config::translator::TranslatorConfig;
use floatdict_types::{CaptureMode, SourceFailure, TranslationEntry, TranslationResult};
use futures_util::future::join_all;

use crate::cache::{CacheKey, TranslationCache};
use crate::google::GoogleTranslator;
use crate::history::{HistoryEntry, LookupHistory};
use crate::longdo::LongdoDictionary;
use crate::merge::merge_entries;
use crate::{LookupRequest, SourceReply, TranslateError, TranslationSource};

/// Fans a lookup out to every applicable source and merges the answers
pub struct TranslationService {
    sources: Vec<Arc<dyn TranslationSource>>,
    timeout: Duration,
    cache: Option<Mutex<TranslationCache>>,
    history: Option<Mutex<LookupHistory>>,
}

impl TranslationService {
    /// The first source is the primary one and decides the detected language
    pub fn new(sources: Vec<Arc<dyn TranslationSource>>, timeout: Duration) -> Self {
        Self {
            sources,
            timeout,
            cache: None,
            history: None,
        }
    }

    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = Some(Mutex::new(cache));
        self
    }

    pub fn with_history(mut self, history: LookupHistory) -> Self {
        self.history = Some(Mutex::new(history));
        self
    }

    /// Google first, then Longdo, sharing one HTTP client
    pub fn from_config(
        config: &TranslatorConfig,
        cache: &CacheConfig,
        history: &HistoryConfig,
    ) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        let mut sources: Vec<Arc<dyn TranslationSource>> = Vec::new();
        if config.google_enabled {
            sources.push(Arc::new(GoogleTranslator::new(
                client.clone(),
                config.google_url.clone(),
            )));
        }
        if config.longdo_enabled {
            sources.push(Arc::new(LongdoDictionary::new(
                client,
                config.longdo_url.clone(),
            )));
        }
        tracing::info!(
            "Translation sources: [{}]",
            sources.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
        );

        let mut service = Self::new(sources, Duration::from_millis(config.timeout_ms));
        if cache.enabled {
            let store = match &cache.path {
                Some(path) => TranslationCache::load(path, cache.max_entries),
                None => TranslationCache::new(cache.max_entries),
            };
            service = service.with_cache(store);
        }
        if history.enabled {
            let recent = match &history.path {
                Some(path) => LookupHistory::load(path, history.max_entries),
                None => LookupHistory::new(history.max_entries),
            };
            service = service.with_history(recent);
        }
        Ok(service)
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    fn cached(&self, key: &CacheKey) -> Option<TranslationResult> {
        let cache = self.cache.as_ref()?.lock().ok()?;
        cache.get(key).cloned()
    }

    fn remember(&self, key: CacheKey, result: &TranslationResult) {
        if let Some(Ok(mut cache)) = self.cache.as_ref().map(|c| c.lock()) {
            cache.insert(key, result.clone());
        }
    }

    fn record(&self, key: &CacheKey) {
        if let Some(Ok(mut history)) = self.history.as_ref().map(|h| h.lock()) {
            history.record(key.clone());
        }
    }

    /// Past lookups, newest first, optionally filtered by a word fragment
    pub fn history(&self, query: Option<&str>) -> Vec<HistoryEntry> {
        match self.history.as_ref().map(|h| h.lock()) {
            Some(Ok(history)) => history.recent(query).into_iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Forgets past lookups and every cached result
    pub fn clear_history(&self) {
        if let Some(Ok(mut history)) = self.history.as_ref().map(|h| h.lock()) {
            history.clear();
        }
        if let Some(Ok(mut cache)) = self.cache.as_ref().map(|c| c.lock()) {
            cache.clear();
        }
        tracing::info!("Lookup history and cache cleared");
    }

    pub fn save_history(&self, path: &Path) -> std::io::Result<()> {
        let Some(history) = &self.history else {
            return Ok(());
        };
        match history.lock() {
            Ok(history) => history.save(path),
            Err(_) => Err(std::io::Error::other("lookup history lock poisoned")),
        }
    }

    pub fn save_cache(&self, path: &Path) -> std::io::Result<()> {
        let Some(cache) = &self.cache else {
            return Ok(());
        };
        match cache.lock() {
            Ok(cache) => cache.save(path),
            Err(_) => Err(std::io::Error::other("translation cache lock poisoned")),
        }
    }

    async fn ask(
        &self,
        source: &Arc<dyn TranslationSource>,
        request: &LookupRequest,
    ) -> Result<SourceReply, TranslateError> {
        match tokio::time::timeout(self.timeout, source.lookup(request)).await {
            Ok(reply) => reply,
            Err(_) => Err(TranslateError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Looks `text` up in every source that applies to the language pair.
    ///
    /// Per-source failures are reported in the result, never as an error.
    pub async fn translate(
        &self,
        text: &str,
        mode: CaptureMode,
        from: &str,
        to: &str,
    ) -> TranslationResult {
        let key = CacheKey::new(text, mode, from, to);
        if let Some(hit) = self.cached(&key) {
            tracing::debug!("Fetching from cache: {}", text);
            self.record(&key);
            return hit;
        }

        let eligible: Vec<&Arc<dyn TranslationSource>> = self
            .sources
            .iter()
            .filter(|s| mode == CaptureMode::Word || s.handles_sentences())
            .collect();

        let mut request = LookupRequest {
            text: text.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            mode,
        };

        let mut consulted = Vec::new();
        let mut failures = Vec::new();
        let mut entries: Vec<TranslationEntry> = Vec::new();
        let mut detected_lang = None;

        let primary = eligible.iter().position(|s| s.supports(from, to));
        if let Some(i) = primary {
            let source = eligible[i];
            consulted.push(source.name().to_string());
            match self.ask(source, &request).await {
                Ok(reply) => {
                    detected_lang = reply.detected_lang;
                    entries.extend(reply.entries);
                }
                Err(e) => {
                    tracing::warn!("{} failed for '{}': {}", source.name(), text, e);
                    failures.push(SourceFailure {
                        source: source.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        // Secondary sources are chosen by what the primary detected
        let effective_from = detected_lang.clone().unwrap_or_else(|| from.to_string());
        request.from = effective_from.clone();

        let secondary: Vec<_> = eligible
            .iter()
            .enumerate()
            .filter(|(i, s)| Some(*i) != primary && s.supports(&effective_from, to))
            .map(|(_, s)| *s)
            .collect();

        let replies = join_all(
            secondary
                .iter()
                .map(|source| self.ask(source, &request)),
        )
        .await;

        for (source, reply) in secondary.iter().zip(replies) {
            consulted.push(source.name().to_string());
            match reply {
                Ok(reply) => entries.extend(reply.entries),
                Err(e) => {
                    tracing::warn!("{} failed for '{}': {}", source.name(), text, e);
                    failures.push(SourceFailure {
                        source: source.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let result = TranslationResult {
            query: text.to_string(),
            mode,
            source_lang: from.to_string(),
            detected_lang,
            target_lang: to.to_string(),
            entries: merge_entries(entries),
            failures,
            consulted,
        };

        tracing::debug!(
            "Translated '{}' via [{}]: {} entries, {} failures",
            text,
            result.consulted.join(", "),
            result.entries.len(),
            result.failures.len()
        );

        if !result.entries.is_empty() {
            self.record(&key);
        }
        if result.failures.is_empty() {
            self.remember(key, &result);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct FakeSource {
        name: &'static str,
        pair: Option<(&'static str, &'static str)>,
        sentences: bool,
        detected: Option<&'static str>,
        entries: Vec<TranslationEntry>,
        delay: Duration,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                pair: None,
                sentences: true,
                detected: None,
                entries: Vec::new(),
                delay: Duration::ZERO,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn answering(mut self, headword: &str, pos: Option<&str>, definition: &str) -> Self {
            let mut entry = TranslationEntry::new(self.name, headword);
            entry.part_of_speech = pos.map(str::to_string);
            entry.push_definition(definition);
            self.entries.push(entry);
            self
        }
    }

    #[async_trait]
    impl TranslationSource for FakeSource {
        fn name(&self) -> &str {
            self.name
        }

        fn supports(&self, from: &str, to: &str) -> bool {
            self.pair.is_none_or(|(f, t)| f == from && t == to)
        }

        fn handles_sentences(&self) -> bool {
            self.sentences
        }

        async fn lookup(&self, _request: &LookupRequest) -> Result<SourceReply, TranslateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(TranslateError::ApiError("HTTP 503".to_string()));
            }
            Ok(SourceReply {
                entries: self.entries.clone(),
                detected_lang: self.detected.map(str::to_string),
            })
        }
    }

    fn google() -> FakeSource {
        FakeSource {
            detected: Some("en"),
            ..FakeSource::new("Google Translate")
        }
        .answering("run", None, "วิ่ง")
        .answering("run", Some("verb"), "วิ่ง")
    }

    fn longdo() -> FakeSource {
        FakeSource {
            pair: Some(("en", "th")),
            sentences: false,
            ..FakeSource::new("Longdo Dict")
        }
        .answering("Run", Some("Verb"), "หนี")
    }

    fn service(sources: Vec<Arc<dyn TranslationSource>>) -> TranslationService {
        TranslationService::new(sources, Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_detected_language_selects_secondary_sources() {
        let longdo = Arc::new(longdo());
        let svc = service(vec![Arc::new(google()), longdo.clone()]);

        // Configured source is ja, but Google detects English
        let result = svc.translate("run", CaptureMode::Word, "ja", "th").await;

        assert_eq!(result.detected_lang.as_deref(), Some("en"));
        assert_eq!(result.consulted, vec!["Google Translate", "Longdo Dict"]);
        assert_eq!(longdo.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[1].sources, vec!["Google Translate", "Longdo Dict"]);
        assert_eq!(result.entries[1].definition_texts(), vec!["วิ่ง", "หนี"]);
        let longdo_defs: Vec<_> = result.entries[1].definitions_from("Longdo Dict").collect();
        assert_eq!(longdo_defs, vec!["หนี"]);
    }

    #[tokio::test]
    async fn test_unsupported_pair_skips_source() {
        let longdo = Arc::new(longdo());
        let primary = FakeSource {
            detected: Some("ja"),
            ..FakeSource::new("Google Translate")
        }
        .answering("走る", None, "วิ่ง");
        let svc = service(vec![Arc::new(primary), longdo.clone()]);

        let result = svc.translate("走る", CaptureMode::Word, "ja", "th").await;
        assert_eq!(longdo.calls.load(Ordering::SeqCst), 0);
        assert!(!result.consulted("Longdo Dict"));
        assert_eq!(result.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_sentence_mode_skips_word_only_sources() {
        let longdo = Arc::new(longdo());
        let svc = service(vec![Arc::new(google()), longdo.clone()]);

        let result = svc.translate("I run home", CaptureMode::Sentence, "en", "th").await;
        assert_eq!(longdo.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.consulted, vec!["Google Translate"]);
    }

    #[tokio::test]
    async fn test_failures_and_timeouts_do_not_hide_other_sources() {
        let slow = FakeSource {
            pair: Some(("en", "th")),
            delay: Duration::from_secs(5),
            ..FakeSource::new("Slow")
        };
        let broken = FakeSource {
            fail: true,
            ..FakeSource::new("Broken")
        };
        let svc = service(vec![Arc::new(google()), Arc::new(slow), Arc::new(broken)]);

        let result = svc.translate("run", CaptureMode::Word, "en", "th").await;

        assert_eq!(result.entries.len(), 2);
        assert!(matches!(
            result.failure_of("Slow"),
            Some(f) if f.message.contains("Timed out")
        ));
        assert!(result.failure_of("Broken").unwrap().message.contains("503"));
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_to_configured_language() {
        let primary = FakeSource {
            fail: true,
            ..FakeSource::new("Google Translate")
        };
        let longdo = Arc::new(longdo());
        let svc = service(vec![Arc::new(primary), longdo.clone()]);

        let result = svc.translate("run", CaptureMode::Word, "en", "th").await;
        assert!(result.failure_of("Google Translate").is_some());
        assert_eq!(result.detected_lang, None);
        assert_eq!(result.entries_from("Longdo Dict").count(), 1);
    }

    #[tokio::test]
    async fn test_successful_results_are_cached() {
        let primary = Arc::new(google());
        let svc = service(vec![primary.clone()]).with_cache(TranslationCache::new(10));

        let first = svc.translate("run", CaptureMode::Word, "en", "th").await;
        let second = svc.translate("run", CaptureMode::Word, "en", "th").await;

        assert_eq!(first, second);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);

        svc.translate("run", CaptureMode::Word, "en", "ja").await;
        assert_eq!(primary.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sentence_result_is_not_served_for_word_lookup() {
        let longdo = Arc::new(longdo());
        let svc = service(vec![Arc::new(google()), longdo.clone()])
            .with_cache(TranslationCache::new(10));

        let sentence = svc.translate("run", CaptureMode::Sentence, "en", "th").await;
        assert_eq!(sentence.consulted, vec!["Google Translate"]);

        let word = svc.translate("run", CaptureMode::Word, "en", "th").await;
        assert_eq!(word.mode, CaptureMode::Word);
        assert!(word.consulted("Longdo Dict"));
        assert_eq!(longdo.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lookups_are_recorded_newest_first() {
        let primary = Arc::new(google());
        let svc = service(vec![primary.clone()])
            .with_cache(TranslationCache::new(10))
            .with_history(LookupHistory::new(10));

        svc.translate("run", CaptureMode::Word, "en", "th").await;
        svc.translate("cat", CaptureMode::Word, "en", "th").await;
        // served from cache, still moves to the front
        svc.translate("run", CaptureMode::Word, "en", "th").await;

        let words: Vec<_> = svc.history(None).iter().map(|e| e.word().to_string()).collect();
        assert_eq!(words, vec!["run", "cat"]);
        assert_eq!(primary.calls.load(Ordering::SeqCst), 2);
        assert_eq!(svc.history(Some("CA")).len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_with_no_answer_is_not_recorded() {
        let broken = FakeSource {
            fail: true,
            ..FakeSource::new("Broken")
        };
        let svc = service(vec![Arc::new(broken)]).with_history(LookupHistory::new(10));

        svc.translate("run", CaptureMode::Word, "en", "th").await;
        assert!(svc.history(None).is_empty());
    }

    #[tokio::test]
    async fn test_clear_history_also_drops_cache() {
        let primary = Arc::new(google());
        let svc = service(vec![primary.clone()])
            .with_cache(TranslationCache::new(10))
            .with_history(LookupHistory::new(10));

        svc.translate("run", CaptureMode::Word, "en", "th").await;
        svc.clear_history();
        assert!(svc.history(None).is_empty());

        svc.translate("run", CaptureMode::Word, "en", "th").await;
        assert_eq!(primary.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_history_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let svc = service(vec![Arc::new(google())]).with_history(LookupHistory::new(10));
        svc.translate("run", CaptureMode::Word, "en", "th").await;
        svc.save_history(&path).unwrap();

        let restarted = service(vec![Arc::new(google())])
            .with_history(LookupHistory::load(&path, 10));
        assert_eq!(restarted.history(None)[0].word(), "run");
    }

    #[tokio::test]
    async fn test_failed_results_are_not_cached() {
        let broken = Arc::new(FakeSource {
            fail: true,
            ..FakeSource::new("Broken")
        });
        let svc = service(vec![broken.clone()]).with_cache(TranslationCache::new(10));

        svc.translate("run", CaptureMode::Word, "en", "th").await;
        svc.translate("run", CaptureMode::Word, "en", "th").await;
        assert_eq!(broken.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_config_respects_toggles() {
        let config = TranslatorConfig {
            longdo_enabled: false,
            ..TranslatorConfig::default()
        };
        let svc = TranslationService::from_config(
            &config,
            &CacheConfig::default(),
            &HistoryConfig::default(),
        )
        .unwrap();
        assert_eq!(svc.source_names(), vec!["Google Translate"]);
        assert!(svc.history(None).is_empty());
    }
}
