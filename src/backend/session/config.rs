use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::aggregator::{ScanAggregator, DEFAULT_SCAN_PASSES};
use crate::backend::mathphysics::Meter;
use crate::backend::scanner::ScanPoller;


pub const DEFAULT_SAMPLING_RADIUS: Meter = 5.0;
pub const MIN_SAMPLING_RADIUS: Meter     = 1.0;
pub const MAX_SAMPLING_RADIUS: Meter     = 100.0;


#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Sampling radius `{0}` m is outside of [1, 100] m")]
    SamplingRadiusOutOfRange(Meter),
    #[error("At least one scan pass is required")]
    ZeroPasses,
}


// Physical radius represented by one measurement.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SamplingRadius(Meter);

impl Default for SamplingRadius {
    fn default() -> Self {
        Self(DEFAULT_SAMPLING_RADIUS)
    }
}

impl SamplingRadius {
    /// # Errors
    ///
    /// Will return `Err` if `meters` is outside of the allowed range.
    pub fn new(meters: Meter) -> Result<Self, ConfigError> {
        if !(MIN_SAMPLING_RADIUS..=MAX_SAMPLING_RADIUS).contains(&meters) {
            return Err(ConfigError::SamplingRadiusOutOfRange(meters));
        }

        Ok(Self(meters))
    }

    #[must_use]
    pub fn meters(&self) -> Meter {
        self.0
    }
}

impl TryFrom<f64> for SamplingRadius {
    type Error = ConfigError;

    fn try_from(meters: f64) -> Result<Self, Self::Error> {
        Self::new(meters)
    }
}

impl From<SamplingRadius> for f64 {
    fn from(sampling_radius: SamplingRadius) -> Self {
        sampling_radius.0
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    sampling_radius: SamplingRadius,
    scan_passes: NonZeroUsize,
    poller: ScanPoller,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sampling_radius: SamplingRadius::default(),
            scan_passes: DEFAULT_SCAN_PASSES,
            poller: ScanPoller::default(),
        }
    }
}

impl SessionConfig {
    /// # Errors
    ///
    /// Will return `Err` if `scan_passes` is zero.
    pub fn build(
        sampling_radius: SamplingRadius,
        scan_passes: usize,
        poller: ScanPoller,
    ) -> Result<Self, ConfigError> {
        let scan_passes = NonZeroUsize::new(scan_passes)
            .ok_or(ConfigError::ZeroPasses)?;

        Ok(Self { sampling_radius, scan_passes, poller })
    }

    #[must_use]
    pub fn sampling_radius(&self) -> SamplingRadius {
        self.sampling_radius
    }

    #[must_use]
    pub fn scan_passes(&self) -> usize {
        self.scan_passes.get()
    }

    #[must_use]
    pub fn poller(&self) -> ScanPoller {
        self.poller
    }

    #[must_use]
    pub fn scan_aggregator(&self) -> ScanAggregator {
        ScanAggregator::new(self.scan_passes, self.poller)
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn default_radius_is_five_meters() {
        assert_eq!(5.0, SamplingRadius::default().meters());
        assert_eq!(5.0, SessionConfig::default().sampling_radius().meters());
        assert_eq!(3, SessionConfig::default().scan_passes());
    }

    #[test]
    fn radius_bounds_are_inclusive() {
        assert_eq!(Ok(1.0), SamplingRadius::new(1.0).map(|r| r.meters()));
        assert_eq!(Ok(100.0), SamplingRadius::new(100.0).map(|r| r.meters()));

        for meters in [0.0, 0.99, 100.5, -5.0, f64::NAN] {
            assert!(
                matches!(
                    SamplingRadius::new(meters),
                    Err(ConfigError::SamplingRadiusOutOfRange(_))
                )
            );
        }
    }

    #[test]
    fn zero_passes_are_rejected() {
        assert_eq!(
            Err(ConfigError::ZeroPasses),
            SessionConfig::build(
                SamplingRadius::default(),
                0,
                ScanPoller::default()
            )
        );
    }

    #[test]
    fn radius_from_json() {
        let radius: SamplingRadius = serde_json::from_str("12.5")
            .unwrap_or_else(|error| panic!("{}", error));

        assert_eq!(12.5, radius.meters());
        assert!(serde_json::from_str::<SamplingRadius>("250.0").is_err());
    }
}
