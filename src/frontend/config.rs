use std::path::{Path, PathBuf};

use crate::backend::mathphysics::Dbm;
use crate::backend::session::SessionConfig;


pub struct GeneralConfig {
    session: SessionConfig,
    survey: SurveyConfig,
}

impl GeneralConfig {
    #[must_use]
    pub fn new(session: SessionConfig, survey: SurveyConfig) -> Self {
        Self { session, survey }
    }

    #[must_use]
    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }

    #[must_use]
    pub fn survey_config(&self) -> &SurveyConfig {
        &self.survey
    }
}


pub struct SurveyConfig {
    plan_path: PathBuf,
    // If `None`, the map extent from the plan is used.
    map_path: Option<PathBuf>,
    // If `None`, every network seen during the survey is interpolated.
    network_name: Option<String>,
    output_directory: Option<PathBuf>,
    scanner_noise: Dbm,
}

impl SurveyConfig {
    #[must_use]
    pub fn new(
        plan_path: &Path,
        map_path: Option<&Path>,
        network_name: Option<&str>,
        output_directory: Option<&Path>,
        scanner_noise: Dbm,
    ) -> Self {
        Self {
            plan_path: plan_path.to_path_buf(),
            map_path: map_path.map(Path::to_path_buf),
            network_name: network_name.map(String::from),
            output_directory: output_directory.map(Path::to_path_buf),
            scanner_noise,
        }
    }

    #[must_use]
    pub fn plan_path(&self) -> &Path {
        &self.plan_path
    }

    #[must_use]
    pub fn map_path(&self) -> Option<&Path> {
        self.map_path.as_deref()
    }

    #[must_use]
    pub fn network_name(&self) -> Option<&str> {
        self.network_name.as_deref()
    }

    #[must_use]
    pub fn output_directory(&self) -> Option<&Path> {
        self.output_directory.as_deref()
    }

    #[must_use]
    pub fn scanner_noise(&self) -> Dbm {
        self.scanner_noise
    }
}
