/// Maps an ISO 639-1 code to Tesseract's traineddata name; unknown codes pass through
pub fn tesseract_language(code: &str) -> String {
    let lang = match code.to_ascii_lowercase().as_str() {
        "en" => "eng",
        "th" => "tha",
        "ja" => "jpn",
        "ko" => "kor",
        "zh-cn" => "chi_sim",
        "zh-tw" => "chi_tra",
        "fr" => "fra",
        "es" => "spa",
        "de" => "deu",
        _ => return code.to_string(),
    };
    lang.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(tesseract_language("ja"), "jpn");
        assert_eq!(tesseract_language("zh-CN"), "chi_sim");
        assert_eq!(tesseract_language("th"), "tha");
    }

    #[test]
    fn test_unknown_code_passes_through() {
        assert_eq!(tesseract_language("jpn+eng"), "jpn+eng");
    }
}
