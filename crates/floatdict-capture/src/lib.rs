mod capture;
mod error;
mod hotkey;
mod lang;
mod ocr;
mod tsv;
mod words;

pub use capture::{CursorLocator, ScreenCapturer, clip_to_bounds, region_around};
#[cfg(windows)]
pub use capture::{SystemCursor, XcapCapturer};
pub use error::{CaptureError, HotkeyError, OcrError};
pub use hotkey::{Binding, HotkeyBindings, parse_binding};
#[cfg(windows)]
pub use hotkey::HotkeyManager;
pub use lang::tesseract_language;
pub use ocr::{TesseractEngine, TextRecognizer, recognized_text};
pub use tsv::parse_tsv;
pub use words::{bounding_region, join_words, reading_order, selected_text, word_at};
