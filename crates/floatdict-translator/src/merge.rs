use std::collections::HashMap;

use floatdict_types::{Definition, TranslationEntry};
use unicode_normalization::UnicodeNormalization;

/// NFKC, trimmed and case-folded; the identity used when merging headwords
pub fn normalize_headword(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_lowercase()
}

type MergeKey = (String, Option<String>);

fn merge_key(entry: &TranslationEntry) -> MergeKey {
    let pos = entry
        .part_of_speech
        .as_deref()
        .map(normalize_headword)
        .filter(|p| !p.is_empty());
    (normalize_headword(&entry.headword), pos)
}

fn push_unique_by<T, K: PartialEq>(into: &mut Vec<T>, items: Vec<T>, key: impl Fn(&T) -> K) {
    for item in items {
        let k = key(&item);
        if !into.iter().any(|existing| key(existing) == k) {
            into.push(item);
        }
    }
}

/// Same meaning from several providers keeps one row crediting all of them
fn absorb_definitions(into: &mut Vec<Definition>, incoming: Vec<Definition>) {
    for definition in incoming {
        let key = normalize_headword(&definition.text);
        match into.iter_mut().find(|d| normalize_headword(&d.text) == key) {
            Some(existing) => push_unique_by(&mut existing.sources, definition.sources, |s| s.clone()),
            None => into.push(definition),
        }
    }
}

fn absorb(target: &mut TranslationEntry, other: TranslationEntry) {
    push_unique_by(&mut target.sources, other.sources, |s| s.clone());
    absorb_definitions(&mut target.definitions, other.definitions);
    push_unique_by(&mut target.examples, other.examples, |e| {
        normalize_headword(&e.source_text)
    });
    if target.dictionary.is_none() {
        target.dictionary = other.dictionary;
    }
}

/// Collapses entries sharing headword and part of speech, keeping first-seen order
pub fn merge_entries(entries: impl IntoIterator<Item = TranslationEntry>) -> Vec<TranslationEntry> {
    let mut merged: Vec<TranslationEntry> = Vec::new();
    let mut index: HashMap<MergeKey, usize> = HashMap::new();

    for entry in entries {
        let key = merge_key(&entry);
        match index.get(&key) {
            Some(&i) => absorb(&mut merged[i], entry),
            None => {
                index.insert(key, merged.len());
                merged.push(entry);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use floatdict_types::Example;

    use super::*;

    fn entry(source: &str, headword: &str, pos: Option<&str>, defs: &[&str]) -> TranslationEntry {
        let mut e = TranslationEntry::new(source, headword);
        e.part_of_speech = pos.map(str::to_string);
        for d in defs {
            e.push_definition(*d);
        }
        e
    }

    #[test]
    fn test_identical_headwords_collapse() {
        let merged = merge_entries(vec![
            entry("Google Translate", "Hello", Some("interjection"), &["สวัสดี", "ฮัลโหล"]),
            entry("Longdo Dict", "hello ", Some("Interjection"), &["สวัสดี", "หวัดดี"]),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].headword, "Hello");
        assert_eq!(merged[0].sources, vec!["Google Translate", "Longdo Dict"]);
        assert_eq!(merged[0].definition_texts(), vec!["สวัสดี", "ฮัลโหล", "หวัดดี"]);
        assert_eq!(
            merged[0].definitions[0].sources,
            vec!["Google Translate", "Longdo Dict"]
        );
        assert_eq!(merged[0].definitions[1].sources, vec!["Google Translate"]);
        assert_eq!(merged[0].definitions[2].sources, vec!["Longdo Dict"]);
    }

    #[test]
    fn test_different_part_of_speech_stays_separate() {
        let merged = merge_entries(vec![
            entry("a", "run", Some("vi"), &["วิ่ง"]),
            entry("a", "run", Some("n"), &["การวิ่ง"]),
            entry("b", "run", None, &["วิ่ง"]),
            entry("b", "run", Some("vi"), &["หนี"]),
        ]);

        let keys: Vec<_> = merged
            .iter()
            .map(|e| (e.part_of_speech.as_deref(), e.definitions.len()))
            .collect();
        assert_eq!(keys, vec![(Some("vi"), 2), (Some("n"), 1), (None, 1)]);
        assert_eq!(merged[0].sources, vec!["a", "b"]);
    }

    #[test]
    fn test_nfkc_folds_full_width_forms() {
        let merged = merge_entries(vec![
            entry("a", "ＡＢＣ", None, &["x"]),
            entry("b", "abc", None, &["y"]),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].definition_texts(), vec!["x", "y"]);
    }

    #[test]
    fn test_untagged_translation_keeps_provider_per_meaning() {
        let merged = merge_entries(vec![
            entry("Google Translate", "run", None, &["วิ่ง"]),
            entry("Longdo Dict", "run", None, &["หนี"]),
        ]);

        assert_eq!(merged.len(), 1);
        let google: Vec<_> = merged[0].definitions_from("Google Translate").collect();
        let longdo: Vec<_> = merged[0].definitions_from("Longdo Dict").collect();
        assert_eq!(google, vec!["วิ่ง"]);
        assert_eq!(longdo, vec!["หนี"]);
    }

    #[test]
    fn test_examples_are_deduplicated() {
        let example = Example {
            source_text: "I run.".to_string(),
            translated_text: "ฉันวิ่ง".to_string(),
        };
        let mut first = entry("a", "run", None, &[]);
        first.examples.push(example.clone());
        let mut second = entry("b", "run", None, &[]);
        second.examples.push(example);
        second.dictionary = Some("NECTEC".to_string());

        let merged = merge_entries(vec![first, second]);
        assert_eq!(merged[0].examples.len(), 1);
        assert_eq!(merged[0].dictionary.as_deref(), Some("NECTEC"));
    }
}
