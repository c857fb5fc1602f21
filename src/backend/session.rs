use std::collections::BTreeSet;

use log::{debug, info};
use thiserror::Error;

use super::calibration::{CalibrationError, CalibrationUnit};
use super::interpolation::{Field, FieldInterpolator, InterpolationError};
use super::mathphysics::{MapExtent, Meter, PixelCoord, PixelsPerMeter};
use super::scanner::{Interface, ScanError, Scanner};
use super::signal::NetworkName;
use super::store::{Measurement, MeasurementStore, StoreError, UpsertOutcome};


pub use config::*;


pub mod config;


#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Calibration failed with error `{0}`")]
    CalibrationError(#[from] CalibrationError),
    #[error("Configuration failed with error `{0}`")]
    ConfigError(#[from] ConfigError),
    #[error("Interpolation failed with error `{0}`")]
    InterpolationError(#[from] InterpolationError),
    #[error("Scan failed with error `{0}`")]
    ScanError(#[from] ScanError),
    #[error("Measurement store failed with error `{0}`")]
    StoreError(#[from] StoreError),
}


// Everything collected for one map. Loading another map means starting a
// new session.
#[derive(Debug)]
pub struct Session {
    map_extent: MapExtent,
    calibration: CalibrationUnit,
    store: MeasurementStore,
    interface: Option<Interface>,
    config: SessionConfig,
}

impl Session {
    #[must_use]
    pub fn new(map_extent: MapExtent) -> Self {
        Self::with_config(map_extent, SessionConfig::default())
    }

    #[must_use]
    pub fn with_config(map_extent: MapExtent, config: SessionConfig) -> Self {
        info!("New session for {map_extent} map");

        Self {
            map_extent,
            calibration: CalibrationUnit::new(),
            store: MeasurementStore::new(),
            interface: None,
            config,
        }
    }

    #[must_use]
    pub fn map_extent(&self) -> MapExtent {
        self.map_extent
    }

    #[must_use]
    pub fn calibration(&self) -> &CalibrationUnit {
        &self.calibration
    }

    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_calibrated()
    }

    #[must_use]
    pub fn pixels_per_meter(&self) -> Option<PixelsPerMeter> {
        self.calibration.pixels_per_meter()
    }

    /// # Errors
    ///
    /// Will return `Err` if the calibration steps are out of order.
    pub fn record_calibration_point(
        &mut self,
        x: PixelCoord,
        y: PixelCoord
    ) -> Result<(), SessionError> {
        self.calibration.record_point(x, y)?;

        Ok(())
    }

    /// # Errors
    ///
    /// Will return `Err` if the calibration steps are out of order or the
    /// points and distance do not define a scale.
    pub fn confirm_calibration_distance(
        &mut self,
        meters: Meter
    ) -> Result<PixelsPerMeter, SessionError> {
        Ok(self.calibration.confirm_distance(meters)?)
    }

    #[must_use]
    pub fn selected_interface(&self) -> Option<&Interface> {
        self.interface.as_ref()
    }

    pub fn select_interface(&mut self, interface: Interface) {
        info!("Interface selected: {interface}");

        self.interface = Some(interface);
    }

    #[must_use]
    pub fn sampling_radius(&self) -> Meter {
        self.config.sampling_radius().meters()
    }

    /// # Errors
    ///
    /// Will return `Err` if `meters` is outside of the allowed range.
    pub fn set_sampling_radius(&mut self, meters: Meter) -> Result<(), SessionError> {
        let sampling_radius = SamplingRadius::new(meters)?;

        self.config = SessionConfig::build(
            sampling_radius,
            self.config.scan_passes(),
            self.config.poller()
        )?;

        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Scans at `(x, y)` and stores the averaged strength of every network
    /// seen there.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the map is not calibrated, no interface is
    /// selected or a scan does not finish in time. Nothing is stored then.
    pub fn record_scan<S: Scanner + ?Sized>(
        &mut self,
        x: PixelCoord,
        y: PixelCoord,
        scanner: &mut S,
    ) -> Result<Vec<(NetworkName, UpsertOutcome)>, SessionError> {
        if !self.is_calibrated() {
            return Err(CalibrationError::NotCalibrated.into());
        }

        let averaged = self.config
            .scan_aggregator()
            .aggregate(scanner, self.interface.as_ref())?;

        let outcomes = averaged
            .into_iter()
            .map(|(network_name, signal_strength)| {
                let outcome = self.store.upsert(
                    x,
                    y,
                    &network_name,
                    signal_strength
                );

                debug!("{network_name} at ({x}, {y}): {outcome:?}");

                (network_name, outcome)
            })
            .collect();

        info!("Scan complete at ({x}, {y})");

        Ok(outcomes)
    }

    #[must_use]
    pub fn store(&self) -> &MeasurementStore {
        &self.store
    }

    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        self.store.measurements()
    }

    #[must_use]
    pub fn network_names(&self) -> BTreeSet<NetworkName> {
        self.store.network_names()
    }

    /// # Errors
    ///
    /// Will return `Err` if the map is not calibrated, the network has no
    /// samples or the samples cannot be interpolated.
    pub fn interpolate(&self, network_name: &str) -> Result<Field, SessionError> {
        let pixels_per_meter = self.calibration.scale()?;
        let samples = self.store.samples_for(network_name)?;

        let field = FieldInterpolator::new(
            self.sampling_radius(),
            pixels_per_meter
        )
            .interpolate(network_name, &samples, self.map_extent)?;

        Ok(field)
    }
}
