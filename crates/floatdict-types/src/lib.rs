pub mod geometry;
pub mod types;

pub use geometry::{Anchor, CaptureRegion, Point};
pub use types::*;
