use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_capture_width() -> u32 {
    400
}

fn default_capture_height() -> u32 {
    300
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract binary; defaults to the bundled `Tesseract-OCR` folder
    pub tesseract_path: Option<PathBuf>,
    /// tessdata folder; defaults to `Tesseract-OCR/tessdata` next to the binary
    pub tessdata_dir: Option<PathBuf>,
    /// Box captured around the cursor for single-word lookups
    #[serde(default = "default_capture_width")]
    pub capture_width: u32,
    #[serde(default = "default_capture_height")]
    pub capture_height: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            tessdata_dir: None,
            capture_width: default_capture_width(),
            capture_height: default_capture_height(),
        }
    }
}
