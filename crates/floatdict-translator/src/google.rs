use async_trait::async_trait;
use floatdict_types::{GOOGLE_TRANSLATE as GOOGLE, TranslationEntry};
use serde_json::Value;

use crate::{LookupRequest, SourceReply, TranslateError, TranslationSource};

/// Google's keyless `translate_a/single` endpoint (client `gtx`)
#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslator {
    pub fn new(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }
}

#[async_trait]
impl TranslationSource for GoogleTranslator {
    fn name(&self) -> &str {
        GOOGLE
    }

    fn supports(&self, _from: &str, _to: &str) -> bool {
        true
    }

    fn handles_sentences(&self) -> bool {
        true
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<SourceReply, TranslateError> {
        let params = [
            ("client", "gtx"),
            ("sl", request.from.as_str()),
            ("tl", request.to.as_str()),
            ("hl", request.to.as_str()),
            ("dt", "t"),
            ("dt", "bd"),
            ("ie", "UTF-8"),
            ("oe", "UTF-8"),
            ("q", request.text.as_str()),
        ];

        let response = self.client.get(&self.api_url).query(&params).send().await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let json: Value = response.json().await.map_err(|e| {
            TranslateError::Parse(format!("Failed to parse response: {}", e))
        })?;

        parse_google_response(&request.text, &json)
    }
}

/// Reads the positional `translate_a/single` payload.
///
/// `[0]` holds `[translated, original, ..]` chunks, `[1]` the dictionary senses
/// `[pos, [terms..], .., base_form]` and `[2]` the detected source language.
pub fn parse_google_response(query: &str, json: &Value) -> Result<SourceReply, TranslateError> {
    let chunks = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Parse("No sentences in response".to_string()))?;

    let translated: String = chunks
        .iter()
        .filter_map(|chunk| chunk.get(0).and_then(Value::as_str))
        .collect();
    let translated = translated.trim();

    let mut entries = Vec::new();

    // Google echoes untranslatable input back unchanged
    if !translated.is_empty() && !translated.eq_ignore_ascii_case(query.trim()) {
        let mut entry = TranslationEntry::new(GOOGLE, query.trim());
        entry.push_definition(translated);
        entries.push(entry);
    }

    let senses = json.get(1).and_then(Value::as_array);
    for sense in senses.into_iter().flatten() {
        let Some(pos) = sense.get(0).and_then(Value::as_str) else {
            continue;
        };
        let terms: Vec<String> = sense
            .get(1)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if terms.is_empty() {
            continue;
        }

        let headword = sense
            .get(3)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(query)
            .trim();

        let mut entry = TranslationEntry::new(GOOGLE, headword);
        entry.part_of_speech = Some(pos.to_string()).filter(|p| !p.is_empty());
        for term in terms {
            entry.push_definition(term);
        }
        entries.push(entry);
    }

    let detected_lang = json
        .get(2)
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(SourceReply {
        entries,
        detected_lang,
    })
}
