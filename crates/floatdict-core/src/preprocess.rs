use unicode_normalization::UnicodeNormalization;

/// Punctuation OCR leaves stuck to a word
const WORD_TRIM: &[char] = &[
    '.', ',', ';', ':', '?', '!', '\'', '"', '-', '(', ')', '。', '、', '「', '」', '『', '』',
];

pub trait Preprocessor: Send + Sync {
    fn process(&self, text: &str) -> String;
}

/// Search form of a single OCR word: punctuation stripped and lowercased
pub struct WordPreprocessor;

impl Preprocessor for WordPreprocessor {
    fn process(&self, text: &str) -> String {
        let text: String = text.trim().nfkc().collect();
        text.trim_matches(|c: char| WORD_TRIM.contains(&c) || c.is_whitespace())
            .to_lowercase()
    }
}

/// Flattens OCR lines into one sentence, rejoining hyphenated line breaks
pub struct SentencePreprocessor;

impl Preprocessor for SentencePreprocessor {
    fn process(&self, text: &str) -> String {
        let text: String = text.nfkc().collect();
        text.replace("-\r\n", "")
            .replace("-\n", "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
