use async_trait::async_trait;
use floatdict_types::{Example, LONGDO_DICT as LONGDO, TranslationEntry};
use scraper::{ElementRef, Html, Selector};

use crate::{LookupRequest, SourceReply, TranslateError, TranslationSource};

/// Section headers scraped from the mobile page, with their display label
const DICTIONARIES: [(&str, &str); 2] = [
    ("NECTEC Lexitron Dictionary EN-TH", "NECTEC"),
    ("Nontri Dictionary", "Nontri Dictionary"),
];

const EXAMPLES_HEADER: &str = "ตัวอย่างประโยคจาก Open Subtitles";

const POS_ABBREVIATIONS: [&str; 8] = ["pron", "adj", "det", "n", "v", "adv", "int", "conj"];

/// English to Thai word lookups scraped from dict.longdo.com
#[derive(Clone)]
pub struct LongdoDictionary {
    client: reqwest::Client,
    api_url: String,
}

impl LongdoDictionary {
    pub fn new(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }
}

#[async_trait]
impl TranslationSource for LongdoDictionary {
    fn name(&self) -> &str {
        LONGDO
    }

    fn supports(&self, from: &str, to: &str) -> bool {
        from.eq_ignore_ascii_case("en") && to.eq_ignore_ascii_case("th")
    }

    fn handles_sentences(&self) -> bool {
        false
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<SourceReply, TranslateError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("search", request.text.as_str())])
            .send()
            .await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        let entries = parse_longdo_html(&request.text, &html)?;
        tracing::debug!("Longdo returned {} entries for '{}'", entries.len(), request.text);

        Ok(SourceReply {
            entries,
            detected_lang: None,
        })
    }
}

fn selector(css: &'static str) -> Result<Selector, TranslateError> {
    Selector::parse(css).map_err(|e| TranslateError::Parse(format!("bad selector {css}: {e:?}")))
}

/// Stripped text nodes joined with `separator`
fn joined_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// First following sibling that is a `<table class="result-table">`
fn result_table_after(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table" && el.value().classes().any(|c| c == "result-table"))
}

/// Splits `(pos) translation`, preferring an abbreviation that leads the translation.
///
/// Returns `(None, raw)` when there is no parenthesised part of speech.
pub fn split_definition(raw: &str) -> (Option<String>, String) {
    let trimmed = raw.trim();
    let Some((pos, rest)) = trimmed
        .strip_prefix('(')
        .and_then(|s| s.split_once(')'))
    else {
        return (None, trimmed.to_string());
    };

    let mut pos = pos.trim().to_string();
    let mut translation = rest.trim().to_string();

    for abbr in POS_ABBREVIATIONS {
        let Some(head) = translation.get(..abbr.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(abbr) {
            continue;
        }
        let tail = &translation[abbr.len()..];
        // "n." or "n " but not the start of "nothing"
        let tail = match tail.strip_prefix('.') {
            Some(t) => t,
            None if tail.is_empty() || tail.starts_with(char::is_whitespace) => tail,
            None => continue,
        };
        pos = head.to_string();
        translation = tail.trim().to_string();
        break;
    }

    (Some(pos).filter(|p| !p.is_empty()), translation)
}

fn fix_common_errors(text: &str) -> String {
    text.replace("your selves", "yourselves")
        .replace("your self", "yourself")
}

/// Extracts dictionary rows and Open Subtitles examples from the mobile page.
///
/// Examples are attached to the first entry; an entry without definitions is
/// created for them when no dictionary matched.
pub fn parse_longdo_html(query: &str, html: &str) -> Result<Vec<TranslationEntry>, TranslateError> {
    let document = Html::parse_document(html);
    let bold = selector("b")?;
    let row = selector("tr")?;
    let cell = selector("td")?;
    let any = selector("*")?;
    let sentence = selector("font[color=black]")?;

    let mut entries = Vec::new();

    for (title, label) in DICTIONARIES {
        let Some(header) = document
            .select(&bold)
            .find(|b| joined_text(*b, "") == title)
        else {
            continue;
        };
        let Some(table) = result_table_after(header) else {
            continue;
        };

        for tr in table.select(&row) {
            let cells: Vec<_> = tr.select(&cell).collect();
            let [word, definition] = cells.as_slice() else {
                continue;
            };

            let word = joined_text(*word, "");
            let (pos, translation) = split_definition(&joined_text(*definition, " "));
            let translation = fix_common_errors(&translation);
            if word.is_empty() || translation.is_empty() {
                continue;
            }

            let mut entry = TranslationEntry::new(LONGDO, word);
            entry.part_of_speech = pos;
            entry.push_definition(translation);
            entry.dictionary = Some(label.to_string());
            entries.push(entry);
        }
    }

    let examples_table = document
        .select(&any)
        .find(|el| {
            el.children()
                .filter_map(|c| c.value().as_text())
                .any(|t| t.trim_start().starts_with(EXAMPLES_HEADER))
        })
        .and_then(result_table_after);

    let examples: Vec<Example> = examples_table
        .into_iter()
        .flat_map(|table| table.select(&row))
        .filter_map(|tr| {
            let parts: Vec<_> = tr.select(&sentence).collect();
            match parts.as_slice() {
                [src, dst] => Some(Example {
                    source_text: joined_text(*src, " "),
                    translated_text: joined_text(*dst, " "),
                }),
                _ => None,
            }
        })
        .collect();

    if !examples.is_empty() {
        match entries.first_mut() {
            Some(first) => first.examples = examples,
            None => {
                let mut entry = TranslationEntry::new(LONGDO, query.trim());
                entry.examples = examples;
                entries.push(entry);
            }
        }
    }

    Ok(entries)
}
