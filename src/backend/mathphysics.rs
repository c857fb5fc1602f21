pub use extent::MapExtent;
pub use point::PixelPoint;
pub use unit::*;


pub mod extent;
pub mod point;
pub mod unit;


// Conversion between logarithmic and linear power:
//     watts = 10^(dbm / 10) / 1000
//     dbm   = 10 * log10(watts * 1000)
#[must_use]
pub fn dbm_to_watts(dbm: Dbm) -> Watt {
    10f64.powf(dbm / 10.0) / MILLIWATTS_IN_WATT
}

#[must_use]
pub fn watts_to_dbm(watts: Watt) -> Dbm {
    10.0 * (watts * MILLIWATTS_IN_WATT).log10()
}

#[must_use]
pub fn meters_to_pixels(meters: Meter, pixels_per_meter: PixelsPerMeter) -> f64 {
    meters * pixels_per_meter
}


pub trait Position {
    fn position(&self) -> PixelPoint;

    fn pixel_distance_to<P: Position>(&self, other: &P) -> f64 {
        self.position().distance_to(&other.position())
    }
}

impl Position for PixelPoint {
    fn position(&self) -> PixelPoint {
        *self
    }
}
