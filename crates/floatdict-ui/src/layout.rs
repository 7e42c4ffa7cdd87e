use floatdict_types::{CaptureRegion, Point};

const OFFSET_X: i32 = 15;
const OFFSET_Y: i32 = 20;
/// Gap kept from the anchor when the tooltip flips left or up
const FLIP_GAP: i32 = 15;
const MAX_WIDTH_RATIO: f64 = 0.35;
const MAX_HEIGHT_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Largest tooltip allowed on a work area
pub fn max_tooltip_size(work_area: &CaptureRegion) -> Size {
    Size::new(
        (work_area.width as f64 * MAX_WIDTH_RATIO) as u32,
        (work_area.height as f64 * MAX_HEIGHT_RATIO) as u32,
    )
}

/// Places a tooltip of `content` size next to `anchor` inside `work_area`.
///
/// Sits below-right of the anchor, flips left/up when it would overflow and
/// is finally clamped so it never leaves the work area.
pub fn tooltip_geometry(anchor: Point, content: Size, work_area: &CaptureRegion) -> CaptureRegion {
    let max = max_tooltip_size(work_area);
    let width = content.width.min(max.width);
    let height = content.height.min(max.height);

    let mut x = anchor.x + OFFSET_X;
    if x + width as i32 > work_area.right() {
        x = anchor.x - width as i32 - FLIP_GAP;
    }

    let mut y = anchor.y + OFFSET_Y;
    if y + height as i32 > work_area.bottom() {
        y = anchor.y - height as i32 - FLIP_GAP;
    }

    x = x.min(work_area.right() - width as i32).max(work_area.x);
    y = y.min(work_area.bottom() - height as i32).max(work_area.y);

    CaptureRegion::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> CaptureRegion {
        CaptureRegion::new(0, 0, 1920, 1040)
    }

    #[test]
    fn test_below_right_of_anchor() {
        let geo = tooltip_geometry(Point::new(100, 100), Size::new(300, 200), &screen());
        assert_eq!(geo, CaptureRegion::new(115, 120, 300, 200));
    }

    #[test]
    fn test_size_is_capped() {
        let geo = tooltip_geometry(Point::new(0, 0), Size::new(5000, 5000), &screen());
        assert_eq!((geo.width, geo.height), (672, 520));
    }

    #[test]
    fn test_flips_near_right_and_bottom_edges() {
        let geo = tooltip_geometry(Point::new(1800, 1000), Size::new(300, 200), &screen());
        assert_eq!(geo, CaptureRegion::new(1485, 785, 300, 200));
    }

    #[test]
    fn test_clamped_to_work_area() {
        // Too close to the top-left corner to flip, and too tall to fit below
        let geo = tooltip_geometry(Point::new(50, 900), Size::new(100, 500), &screen());
        assert!(geo.y >= 0 && geo.bottom() <= 1040);
        assert_eq!(geo.x, 65);

        let offset = CaptureRegion::new(-1920, 0, 1920, 1080);
        let geo = tooltip_geometry(Point::new(-10, 10), Size::new(400, 100), &offset);
        assert!(geo.x >= -1920 && geo.right() <= 0);
    }
}
