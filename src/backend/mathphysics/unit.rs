pub type Dbm            = f64;
pub type Meter          = f64;
pub type Millisecond    = u64;
pub type PixelCoord     = i32;
pub type PixelsPerMeter = f64;
pub type Watt           = f64;


pub const MILLIWATTS_IN_WATT: f64 = 1_000.0;
