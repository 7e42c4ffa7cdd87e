use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No monitor found")]
    NoMonitor,

    #[error("Capture region {width}x{height} at ({x}, {y}) is empty or off-screen")]
    EmptyRegion {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("Screen capture failed: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not found at {0}")]
    EngineNotFound(PathBuf),

    #[error("Failed to launch {binary}: {source}")]
    Launch {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OCR engine exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("OCR IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode capture: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("Invalid hotkey '{binding}': {reason}")]
    InvalidBinding { binding: String, reason: String },

    #[error("Failed to register hotkey '{binding}': {reason}")]
    Register { binding: String, reason: String },

    #[error("Failed to create hotkey manager: {0}")]
    Manager(String),
}
