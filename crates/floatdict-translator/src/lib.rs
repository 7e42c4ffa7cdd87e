mod cache;
mod error;
mod google;
mod history;
mod longdo;
mod merge;
mod service;

pub use cache::{CacheKey, TranslationCache};
pub use error::TranslateError;
pub use google::{GoogleTranslator, parse_google_response};
pub use history::{HistoryEntry, LookupHistory};
pub use longdo::{LongdoDictionary, parse_longdo_html, split_definition};
pub use merge::{merge_entries, normalize_headword};
pub use service::TranslationService;

use floatdict_types::{CaptureMode, TranslationEntry};

pub type LanguageCode = String;

#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub mode: CaptureMode,
}

#[derive(Debug, Clone, Default)]
pub struct SourceReply {
    pub entries: Vec<TranslationEntry>,
    /// Language the provider detected, when it reports one
    pub detected_lang: Option<LanguageCode>,
}

/// A translation or dictionary provider
#[async_trait::async_trait]
pub trait TranslationSource: Send + Sync {
    /// Display name, also used as `TranslationEntry::sources` label
    fn name(&self) -> &str;

    fn supports(&self, from: &str, to: &str) -> bool;

    /// Whether whole sentences make sense for this provider
    fn handles_sentences(&self) -> bool;

    async fn lookup(&self, request: &LookupRequest) -> Result<SourceReply, TranslateError>;
}
