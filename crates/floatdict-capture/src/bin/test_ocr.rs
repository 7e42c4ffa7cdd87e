//! Run OCR on an image file - cargo run -p floatdict-capture --bin test_ocr -- shot.png en

use anyhow::{Context, Result};
use floatdict_capture::{TesseractEngine, TextRecognizer, recognized_text};
use floatdict_types::Point;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().context("usage: test_ocr <image> [lang]")?;
    let lang = args.next().unwrap_or_else(|| "en".to_string());

    let engine = TesseractEngine::locate(None, None, &lang)?;
    tracing::info!("Engine: {}", engine.version()?);

    let image = image::open(&path)
        .with_context(|| format!("Failed to open {path}"))?
        .to_rgba8();

    let start = std::time::Instant::now();
    let words = engine.recognize(&image, Point::default())?;
    tracing::info!("{} words in {:?}", words.len(), start.elapsed());

    for word in words.iter().take(20) {
        tracing::info!(
            "  {:>5.1}% {:?} '{}'",
            word.confidence,
            word.region,
            word.text
        );
    }

    let text = recognized_text(words);
    for line in text.text.lines().take(5) {
        tracing::info!("> {}", line);
    }

    Ok(())
}
