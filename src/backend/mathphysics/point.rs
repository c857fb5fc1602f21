use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::PixelCoord;


// Location on the map image. The origin is the top-left corner, `y` grows
// downwards.
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize, Deserialize
)]
#[display("({x}, {y})")]
pub struct PixelPoint {
    pub x: PixelCoord,
    pub y: PixelCoord,
}

impl PixelPoint {
    #[must_use]
    pub fn new(x: PixelCoord, y: PixelCoord) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);

        dx.hypot(dy)
    }

    // Rows first, so that samples are ordered the way a raster is scanned.
    #[must_use]
    pub fn raster_key(&self) -> (PixelCoord, PixelCoord) {
        (self.y, self.x)
    }
}

impl From<(PixelCoord, PixelCoord)> for PixelPoint {
    fn from((x, y): (PixelCoord, PixelCoord)) -> Self {
        Self::new(x, y)
    }
}
