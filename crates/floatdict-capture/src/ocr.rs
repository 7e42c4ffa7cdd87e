use std::path::{Path, PathBuf};
use std::process::Command;

use floatdict_types::{Point, RecognizedText, WordBox};
use image::{ImageFormat, RgbaImage};

use crate::error::OcrError;
use crate::lang::tesseract_language;
use crate::tsv::parse_tsv;
use crate::words::join_words;

/// Folder shipped next to the executable by the installer
const BUNDLE_DIR: &str = "Tesseract-OCR";

#[cfg(windows)]
const BINARY_NAME: &str = "tesseract.exe";
#[cfg(not(windows))]
const BINARY_NAME: &str = "tesseract";

/// Turns an image into positioned words
pub trait TextRecognizer: Send + Sync {
    /// `origin` is the screen position of the image's top-left pixel
    fn recognize(&self, image: &RgbaImage, origin: Point) -> Result<Vec<WordBox>, OcrError>;
}

/// Groups words into lines and joins them into plain text
pub fn recognized_text(words: Vec<WordBox>) -> RecognizedText {
    let mut lines: Vec<Vec<WordBox>> = Vec::new();
    for word in &words {
        match lines.last_mut() {
            Some(line) if line[0].line_key == word.line_key => line.push(word.clone()),
            _ => lines.push(vec![word.clone()]),
        }
    }

    let text = lines
        .iter()
        .map(|line| join_words(line))
        .collect::<Vec<_>>()
        .join("\n");

    RecognizedText { text, words }
}

/// Tesseract run as a subprocess
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    tessdata_dir: Option<PathBuf>,
    language: String,
}

impl TesseractEngine {
    /// `language` is an ISO 639-1 code or a raw Tesseract language spec
    pub fn new(binary: PathBuf, tessdata_dir: Option<PathBuf>, language: &str) -> Self {
        Self {
            binary,
            tessdata_dir,
            language: tesseract_language(language),
        }
    }

    /// `Tesseract-OCR` next to the running executable
    pub fn bundled_dir() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        Some(exe.parent()?.join(BUNDLE_DIR))
    }

    /// Resolves configured paths, then the bundled copy, then `PATH`
    pub fn locate(
        binary: Option<&Path>,
        tessdata_dir: Option<&Path>,
        language: &str,
    ) -> Result<Self, OcrError> {
        let bundled = Self::bundled_dir();

        let binary = match binary {
            Some(path) if path.exists() => path.to_path_buf(),
            Some(path) => return Err(OcrError::EngineNotFound(path.to_path_buf())),
            None => bundled
                .as_ref()
                .map(|dir| dir.join(BINARY_NAME))
                .filter(|p| p.exists())
                .unwrap_or_else(|| PathBuf::from(BINARY_NAME)),
        };

        let tessdata_dir = tessdata_dir.map(Path::to_path_buf).or_else(|| {
            bundled
                .map(|dir| dir.join("tessdata"))
                .filter(|p| p.is_dir())
        });

        tracing::debug!(
            "Using tesseract at {} (tessdata: {:?})",
            binary.display(),
            tessdata_dir
        );
        Ok(Self::new(binary, tessdata_dir, language))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(dir) = &self.tessdata_dir {
            cmd.env("TESSDATA_PREFIX", dir);
        }
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }
        cmd
    }

    fn run(&self, cmd: &mut Command) -> Result<String, OcrError> {
        let output = cmd.output().map_err(|source| OcrError::Launch {
            binary: self.binary.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Startup check that the engine runs at all
    pub fn version(&self) -> Result<String, OcrError> {
        let stdout = self.run(self.command().arg("--version"))?;
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }
}

impl TextRecognizer for TesseractEngine {
    fn recognize(&self, image: &RgbaImage, origin: Point) -> Result<Vec<WordBox>, OcrError> {
        let mut file = tempfile::Builder::new()
            .prefix("floatdict-")
            .suffix(".png")
            .tempfile()?;
        image.write_to(&mut file, ImageFormat::Png)?;

        let tsv = self.run(
            self.command()
                .arg(file.path())
                .arg("stdout")
                .args(["-l", self.language.as_str()])
                .arg("tsv"),
        )?;

        let words = parse_tsv(&tsv, origin);
        tracing::debug!(
            "OCR ({}) found {} words in {}x{} image",
            self.language,
            words.len(),
            image.width(),
            image.height()
        );
        Ok(words)
    }
}
