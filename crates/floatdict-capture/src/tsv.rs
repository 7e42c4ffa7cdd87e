use floatdict_types::{CaptureRegion, Point, WordBox};

const WORD_LEVEL: u32 = 5;

/// Parses `tesseract ... tsv` output into word boxes offset by `origin`.
///
/// Columns: level, page, block, par, line, word, left, top, width, height, conf, text.
/// Non-word rows, blank words and malformed rows are skipped.
pub fn parse_tsv(tsv: &str, origin: Point) -> Vec<WordBox> {
    tsv.lines()
        .filter_map(|line| parse_row(line, origin))
        .collect()
}

fn parse_row(line: &str, origin: Point) -> Option<WordBox> {
    let cols: Vec<&str> = line.splitn(12, '\t').collect();
    if cols.len() < 12 {
        return None;
    }

    let level: u32 = cols[0].trim().parse().ok()?;
    if level != WORD_LEVEL {
        return None;
    }

    let text = cols[11].trim();
    if text.is_empty() {
        return None;
    }

    let num = |i: usize| cols[i].trim().parse::<i32>().ok();
    let block = num(2)? as u32;
    let par = num(3)? as u32;
    let line_num = num(4)? as u32;
    let left = num(6)?;
    let top = num(7)?;
    let width = num(8)?.max(0) as u32;
    let height = num(9)?.max(0) as u32;
    let confidence = cols[10].trim().parse::<f32>().unwrap_or(-1.0);

    Some(WordBox {
        text: text.to_string(),
        region: CaptureRegion::new(origin.x + left, origin.y + top, width, height),
        confidence,
        line_key: (block, par, line_num),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t400\t300\t-1\t
2\t1\t1\t0\t0\t0\t12\t40\t210\t22\t-1\t
4\t1\t1\t1\t1\t0\t12\t40\t210\t22\t-1\t
5\t1\t1\t1\t1\t1\t12\t40\t60\t22\t96.5\tHello,
5\t1\t1\t1\t1\t2\t80\t40\t70\t22\t91.2\tworld
5\t1\t1\t1\t1\t3\t160\t40\t10\t22\t12.0\t
5\t1\t1\t1\t2\t1\t12\t70\t40\t20\t88.0\tagain
garbage line";

    #[test]
    fn test_parse_words_only() {
        let words = parse_tsv(SAMPLE, Point::new(0, 0));
        let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello,", "world", "again"]);
    }

    #[test]
    fn test_boxes_are_offset_by_origin() {
        let words = parse_tsv(SAMPLE, Point::new(800, 650));
        assert_eq!(words[1].region, CaptureRegion::new(880, 690, 70, 22));
        assert_eq!(words[1].line_key, (1, 1, 1));
        assert_eq!(words[2].line_key, (1, 1, 2));
        assert!((words[0].confidence - 96.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_output_yields_no_words() {
        assert!(parse_tsv("", Point::default()).is_empty());
        let header_only = SAMPLE.lines().next().unwrap();
        assert!(parse_tsv(header_only, Point::default()).is_empty());
    }
}
