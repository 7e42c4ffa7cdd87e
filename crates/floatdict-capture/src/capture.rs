use floatdict_types::{CaptureRegion, Point};
use image::RgbaImage;

use crate::error::CaptureError;

/// Grabs screen pixels for a region
pub trait ScreenCapturer: Send + Sync {
    fn capture(&self, region: CaptureRegion) -> Result<RgbaImage, CaptureError>;
}

/// Reports the mouse pointer in screen pixels
pub trait CursorLocator: Send + Sync {
    fn cursor_position(&self) -> Option<Point>;
}

/// Win32 `GetCursorPos`
#[cfg(windows)]
pub struct SystemCursor;

#[cfg(windows)]
impl CursorLocator for SystemCursor {
    fn cursor_position(&self) -> Option<Point> {
        use windows::Win32::Foundation::POINT;
        use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point).ok()? };
        Some(Point::new(point.x, point.y))
    }
}

/// Box of `width`x`height` centred on `point`, top-left clamped to zero
pub fn region_around(point: Point, width: u32, height: u32) -> CaptureRegion {
    let left = (point.x - (width / 2) as i32).max(0);
    let top = (point.y - (height / 2) as i32).max(0);
    CaptureRegion::new(left, top, width, height)
}

/// Clips `region` to `bounds`, erroring when nothing is left
pub fn clip_to_bounds(
    region: CaptureRegion,
    bounds: CaptureRegion,
) -> Result<CaptureRegion, CaptureError> {
    region
        .intersect(&bounds)
        .filter(|r| !r.is_empty())
        .ok_or(CaptureError::EmptyRegion {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
        })
}

/// Monitor-backed capturer
#[cfg(windows)]
pub struct XcapCapturer;

#[cfg(windows)]
impl XcapCapturer {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl ScreenCapturer for XcapCapturer {
    fn capture(&self, region: CaptureRegion) -> Result<RgbaImage, CaptureError> {
        use xcap::Monitor;

        let monitors = Monitor::all().map_err(|e| CaptureError::Backend(e.to_string()))?;

        let bounds_of = |m: &Monitor| CaptureRegion::new(m.x(), m.y(), m.width(), m.height());

        // Prefer the monitor holding the region's top-left corner
        let monitor = monitors
            .iter()
            .find(|m| bounds_of(m).contains(region.top_left()))
            .or(monitors.first())
            .ok_or(CaptureError::NoMonitor)?;

        let bounds = bounds_of(monitor);
        let clipped = clip_to_bounds(region, bounds)?;

        let shot = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        let (width, height) = (shot.width(), shot.height());
        let full = RgbaImage::from_raw(width, height, shot.into_raw())
            .ok_or_else(|| CaptureError::Backend("monitor buffer size mismatch".to_string()))?;

        let cropped = image::imageops::crop_imm(
            &full,
            (clipped.x - bounds.x) as u32,
            (clipped.y - bounds.y) as u32,
            clipped.width,
            clipped.height,
        )
        .to_image();

        tracing::debug!(
            "Captured {}x{} at ({}, {})",
            clipped.width,
            clipped.height,
            clipped.x,
            clipped.y
        );
        Ok(cropped)
    }
}
