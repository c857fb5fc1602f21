use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::PixelPoint;


// Pixel size of the map image.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize
)]
#[display("{width}x{height}")]
pub struct MapExtent {
    width: u32,
    height: u32,
}

impl MapExtent {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        Some(Self { width, height })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn contains(&self, point: &PixelPoint) -> bool {
        u32::try_from(point.x).is_ok_and(|x| x < self.width)
            && u32::try_from(point.y).is_ok_and(|y| y < self.height)
    }
}
