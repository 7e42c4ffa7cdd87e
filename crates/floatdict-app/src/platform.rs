use std::sync::Arc;

use floatdict_capture::{CursorLocator, ScreenCapturer};
#[cfg(windows)]
use floatdict_capture::{SystemCursor, XcapCapturer};
#[cfg(not(windows))]
use floatdict_capture::CaptureError;
#[cfg(not(windows))]
use floatdict_types::{CaptureRegion, Point};
#[cfg(not(windows))]
use image::RgbaImage;

#[cfg(windows)]
pub fn capturer() -> Arc<dyn ScreenCapturer> {
    Arc::new(XcapCapturer::new())
}

#[cfg(windows)]
pub fn cursor() -> Arc<dyn CursorLocator> {
    Arc::new(SystemCursor)
}

#[cfg(not(windows))]
pub fn capturer() -> Arc<dyn ScreenCapturer> {
    Arc::new(Unsupported)
}

#[cfg(not(windows))]
pub fn cursor() -> Arc<dyn CursorLocator> {
    Arc::new(Unsupported)
}

/// Stand-in on platforms without a screen backend; every capture reports an error
#[cfg(not(windows))]
pub struct Unsupported;

#[cfg(not(windows))]
impl ScreenCapturer for Unsupported {
    fn capture(&self, _region: CaptureRegion) -> Result<RgbaImage, CaptureError> {
        Err(CaptureError::Backend(
            "screen capture is only available on Windows".to_string(),
        ))
    }
}

#[cfg(not(windows))]
impl CursorLocator for Unsupported {
    fn cursor_position(&self) -> Option<Point> {
        None
    }
}
