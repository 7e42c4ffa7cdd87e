use floatdict_types::{CaptureRegion, Point, WordBox};

/// First word whose box contains `point`
pub fn word_at(words: &[WordBox], point: Point) -> Option<&WordBox> {
    words.iter().find(|w| w.region.contains(point))
}

pub fn bounding_region(words: &[WordBox]) -> Option<CaptureRegion> {
    let mut iter = words.iter();
    let first = iter.next()?.region;
    Some(iter.fold(first, |acc, w| acc.union(&w.region)))
}

/// Sorts loose word boxes into lines, top to bottom, each read left to right.
///
/// A word joins the current line when its vertical centre sits above the
/// bottom of the line's last word.
pub fn reading_order(mut words: Vec<WordBox>) -> Vec<Vec<WordBox>> {
    words.sort_by_key(|w| w.region.y);

    let mut lines: Vec<Vec<WordBox>> = Vec::new();
    for word in words {
        let centre = word.region.y + word.region.height as i32 / 2;
        match lines.last_mut() {
            Some(line) if line.last().is_some_and(|prev| centre < prev.region.bottom()) => {
                line.push(word)
            }
            _ => lines.push(vec![word]),
        }
    }
    for line in &mut lines {
        line.sort_by_key(|w| w.region.x);
    }
    lines
}

/// Text of hand-picked words, one output line per screen line
pub fn selected_text(words: Vec<WordBox>) -> String {
    reading_order(words)
        .iter()
        .map(|line| join_words(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scripts written without spaces between words
fn is_unspaced(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'   // kana
        | '\u{3400}'..='\u{4DBF}' // CJK ext A
        | '\u{4E00}'..='\u{9FFF}' // CJK unified
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF00}'..='\u{FFEF}' // full-width forms
        | '\u{3000}'..='\u{303F}' // CJK punctuation
        | '\u{0E00}'..='\u{0E7F}' // Thai
        | '\u{AC00}'..='\u{D7AF}' // Hangul syllables
    )
}

/// Joins words in reading order, with spaces only where the script uses them
pub fn join_words(words: &[WordBox]) -> String {
    let mut out = String::new();
    for word in words {
        let needs_space = match (out.chars().last(), word.text.chars().next()) {
            (Some(prev), Some(next)) => !(is_unspaced(prev) && is_unspaced(next)),
            _ => false,
        };
        if needs_space {
            out.push(' ');
        }
        out.push_str(&word.text);
    }
    out
}
