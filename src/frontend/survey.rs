use std::path::Path;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::interpolation::Field;
use crate::backend::mathphysics::{Dbm, MapExtent, Meter, PixelPoint};
use crate::backend::scanner::{Scanner, SimulatedScanner, VirtualAccessPoint};
use crate::backend::session::{Session, SessionConfig, SessionError};
use crate::frontend::config::GeneralConfig;
use crate::frontend::map::{MapError, MapImage};


pub use output::*;


pub mod output;


#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Failed to read survey plan with error `{0}`")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse survey plan with error `{0}`")]
    JsonError(#[from] serde_json::Error),
    #[error("{0}")]
    MapError(#[from] MapError),
    #[error("Neither a map image nor a map extent was given")]
    NoMapExtent,
    #[error("Scanner has no interface `{0}`")]
    UnknownInterface(String),
    #[error("{0}")]
    SessionError(#[from] SessionError),
}


#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationPlan {
    pub points: Vec<PixelPoint>,
    pub distance: Meter,
}


// Everything an operator would click through, recorded up front.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveyPlan {
    #[serde(default)]
    map_extent: Option<MapExtent>,
    calibration: CalibrationPlan,
    interface: String,
    access_points: Vec<VirtualAccessPoint>,
    locations: Vec<PixelPoint>,
}

impl SurveyPlan {
    /// # Errors
    ///
    /// Will return `Err` if `json` does not describe a survey plan.
    pub fn from_json(json: &str) -> Result<Self, SurveyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Will return `Err` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SurveyError> {
        let json = std::fs::read_to_string(path)?;

        Self::from_json(&json)
    }

    #[must_use]
    pub fn calibration(&self) -> &CalibrationPlan {
        &self.calibration
    }

    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    #[must_use]
    pub fn access_points(&self) -> &[VirtualAccessPoint] {
        &self.access_points
    }

    #[must_use]
    pub fn locations(&self) -> &[PixelPoint] {
        &self.locations
    }

    /// The map image wins over the extent written in the plan.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the image cannot be read or no extent is known.
    pub fn map_extent(&self, map_path: Option<&Path>) -> Result<MapExtent, SurveyError> {
        match map_path {
            Some(path) => Ok(MapImage::load(path)?),
            None       => self.map_extent.ok_or(SurveyError::NoMapExtent),
        }
    }
}


pub struct Survey {
    plan: SurveyPlan,
    session: Session,
    scanner: SimulatedScanner,
}

impl Survey {
    /// Starts a session and replays the calibration of the plan.
    ///
    /// # Errors
    ///
    /// Will return `Err` if calibration fails or the scanner does not have
    /// the interface named in the plan.
    pub fn prepare(
        plan: SurveyPlan,
        map_extent: MapExtent,
        session_config: SessionConfig,
        scanner_noise: Dbm,
    ) -> Result<Self, SurveyError> {
        let mut session = Session::with_config(map_extent, session_config);

        for point in &plan.calibration.points {
            session.record_calibration_point(point.x, point.y)?;
        }

        let pixels_per_meter = session
            .confirm_calibration_distance(plan.calibration.distance)?;

        info!("Calibrated: {pixels_per_meter:.3} px/m");

        let scanner = SimulatedScanner::new(
            &[plan.interface.as_str()],
            plan.access_points.clone()
        )
            .with_noise(scanner_noise);

        let interface = scanner
            .find_interface(&plan.interface)
            .ok_or_else(|| SurveyError::UnknownInterface(plan.interface.clone()))?;

        session.select_interface(interface);

        Ok(Self { plan, session, scanner })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    // Returns the number of locations that were scanned.
    pub fn scan_locations(&mut self) -> usize {
        let map_extent = self.session.map_extent();
        let mut scanned = 0;

        for location in &self.plan.locations {
            if !map_extent.contains(location) {
                warn!("Skipping {location}: outside of {map_extent} map");
                continue;
            }

            self.scanner.move_to(*location);

            match self.session.record_scan(location.x, location.y, &mut self.scanner) {
                Ok(_)      => scanned += 1,
                Err(error) => error!("Scan at {location} failed: {error}"),
            }
        }

        info!(
            "Scanned {scanned}/{} locations, {} measurements stored",
            self.plan.locations.len(),
            self.session.measurements().len()
        );

        scanned
    }

    // If `network_name` is `None`, every stored network is interpolated.
    #[must_use]
    pub fn interpolate(&self, network_name: Option<&str>) -> Vec<Field> {
        let network_names = match network_name {
            Some(network_name) => vec![network_name.to_string()],
            None               => self.session.network_names().into_iter().collect(),
        };

        network_names
            .iter()
            .filter_map(|network_name| {
                match self.session.interpolate(network_name) {
                    Ok(field) => {
                        info!(
                            "Field of `{network_name}`: {}x{} points, \
                            values from {:.2} to {:.2}",
                            field.columns(),
                            field.rows(),
                            field.min_value(),
                            field.max_value()
                        );

                        Some(field)
                    },
                    Err(error) => {
                        error!("Interpolation of `{network_name}` failed: {error}");

                        None
                    }
                }
            })
            .collect()
    }
}


pub fn execute(config: &GeneralConfig) {
    if let Err(error) = run(config) {
        error!("Survey aborted: {error}");
    }
}

fn run(config: &GeneralConfig) -> Result<(), SurveyError> {
    let survey_config = config.survey_config();

    let plan       = SurveyPlan::load(survey_config.plan_path())?;
    let map_extent = plan.map_extent(survey_config.map_path())?;

    let mut survey = Survey::prepare(
        plan,
        map_extent,
        *config.session_config(),
        survey_config.scanner_noise()
    )?;

    survey.scan_locations();

    let fields = survey.interpolate(survey_config.network_name());

    if let Some(output_directory) = survey_config.output_directory() {
        write_survey(output_directory, survey.session(), &fields);
    }

    Ok(())
}
