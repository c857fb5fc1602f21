use log::info;
use serde::Serialize;
use thiserror::Error;

use super::mathphysics::{Meter, PixelCoord, PixelPoint, PixelsPerMeter};


pub const MIN_CALIBRATION_DISTANCE: Meter = 0.1;
pub const MAX_CALIBRATION_DISTANCE: Meter = 1_000.0;

const CALIBRATION_POINT_COUNT: usize = 2;


#[derive(Debug, Error, PartialEq)]
pub enum CalibrationError {
    #[error("Both calibration points are already recorded")]
    TooManyPoints,
    #[error("Two calibration points are required before confirming distance")]
    NotEnoughPoints,
    #[error("Calibration is already complete for this session")]
    AlreadyCalibrated,
    #[error("Map is not calibrated yet")]
    NotCalibrated,
    #[error("Calibration distance `{0}` m is outside of (0.1, 1000] m")]
    DegenerateDistance(Meter),
    #[error("Calibration points {0} and {1} are too close to each other")]
    DegeneratePoints(PixelPoint, PixelPoint),
}

impl CalibrationError {
    // Whether the calibration steps were invoked out of order, as opposed to
    // being invoked with unusable values.
    #[must_use]
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            Self::TooManyPoints
                | Self::NotEnoughPoints
                | Self::AlreadyCalibrated
                | Self::NotCalibrated
        )
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
enum CalibrationState {
    Collecting,
    Calibrated(PixelsPerMeter),
}


// Two clicked points and the real distance between them give the map scale.
// Once confirmed the scale stays fixed, a new map needs a new unit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalibrationUnit {
    points: Vec<PixelPoint>,
    state: CalibrationState,
}

impl Default for CalibrationUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationUnit {
    #[must_use]
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(CALIBRATION_POINT_COUNT),
            state: CalibrationState::Collecting,
        }
    }

    #[must_use]
    pub fn points(&self) -> &[PixelPoint] {
        &self.points
    }

    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        matches!(self.state, CalibrationState::Calibrated(_))
    }

    #[must_use]
    pub fn pixels_per_meter(&self) -> Option<PixelsPerMeter> {
        match self.state {
            CalibrationState::Calibrated(pixels_per_meter) =>
                Some(pixels_per_meter),
            CalibrationState::Collecting => None,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if the unit is not calibrated yet.
    pub fn scale(&self) -> Result<PixelsPerMeter, CalibrationError> {
        self.pixels_per_meter()
            .ok_or(CalibrationError::NotCalibrated)
    }

    /// # Errors
    ///
    /// Will return `Err` if two points are already recorded or the unit
    /// is calibrated.
    pub fn record_point(
        &mut self,
        x: PixelCoord,
        y: PixelCoord
    ) -> Result<(), CalibrationError> {
        if self.is_calibrated() {
            return Err(CalibrationError::AlreadyCalibrated);
        }
        if self.points.len() >= CALIBRATION_POINT_COUNT {
            return Err(CalibrationError::TooManyPoints);
        }

        self.points.push(PixelPoint::new(x, y));

        Ok(())
    }

    /// # Errors
    ///
    /// Will return `Err` if the steps are out of order, the distance is
    /// outside of the allowed range or the points coincide.
    pub fn confirm_distance(
        &mut self,
        meters: Meter
    ) -> Result<PixelsPerMeter, CalibrationError> {
        if self.is_calibrated() {
            return Err(CalibrationError::AlreadyCalibrated);
        }

        let [p1, p2] = self.points[..] else {
            return Err(CalibrationError::NotEnoughPoints);
        };

        if !meters.is_finite()
            || meters <= MIN_CALIBRATION_DISTANCE
            || meters > MAX_CALIBRATION_DISTANCE
        {
            return Err(CalibrationError::DegenerateDistance(meters));
        }

        let pixel_distance = p1.distance_to(&p2);

        if pixel_distance < 1.0 {
            return Err(CalibrationError::DegeneratePoints(p1, p2));
        }

        let pixels_per_meter = pixel_distance / meters;

        info!("Calibration pixels: {pixel_distance:.2}");
        info!("Calibration meters: {meters}");
        info!("Calibration: {pixels_per_meter:.2} pixels per meter");

        self.state = CalibrationState::Calibrated(pixels_per_meter);

        Ok(pixels_per_meter)
    }
}
