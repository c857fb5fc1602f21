use std::path::{Path, PathBuf};

use clap::ArgMatches;
use log::{error, LevelFilter};

use crate::backend::aggregator::DEFAULT_SCAN_PASSES;
use crate::backend::mathphysics::{Dbm, Meter, Millisecond};
use crate::backend::scanner::{
    ScanPoller, DEFAULT_SCAN_TIMEOUT as DEFAULT_SCAN_TIMEOUT_MS, MAX_NOISE
};
use crate::backend::session::{
    ConfigError, SamplingRadius, SessionConfig, DEFAULT_SAMPLING_RADIUS
};
use crate::frontend::config::{GeneralConfig, SurveyConfig};
use crate::frontend::survey;


pub const ARG_JSON_OUTPUT: &str  = "output directory path";
pub const ARG_MAP: &str          = "map image path";
pub const ARG_NETWORK: &str      = "network name";
pub const ARG_NOISE: &str        = "scanner noise";
pub const ARG_PASSES: &str       = "scan passes";
pub const ARG_PLAN: &str         = "survey plan path";
pub const ARG_RADIUS: &str       = "sampling radius";
pub const ARG_SCAN_TIMEOUT: &str = "scan timeout";
pub const ARG_VERBOSE: &str      = "verbose";

pub const DEFAULT_NOISE: &str        = "2.0";
pub const DEFAULT_PASSES: &str       = "3";
pub const DEFAULT_RADIUS: &str       = "5.0";
pub const DEFAULT_SCAN_TIMEOUT: &str = "10000";


pub fn handle_arguments(matches: &ArgMatches) {
    init_logger(verbose(matches));

    let Some(plan_path) = plan_path(matches) else {
        return;
    };

    let session_config = match session_config(matches) {
        Ok(session_config) => session_config,
        Err(error)         => {
            error!("{error}");
            return;
        }
    };

    let Some(noise) = valid_noise(noise(matches)) else {
        error!("Scanner noise must be within [0, {MAX_NOISE}] dBm");
        return;
    };

    let survey_config = SurveyConfig::new(
        plan_path,
        map_path(matches),
        network_name(matches),
        output_directory(matches),
        noise,
    );

    survey::execute(&GeneralConfig::new(session_config, survey_config));
}

fn init_logger(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn session_config(matches: &ArgMatches) -> Result<SessionConfig, ConfigError> {
    SessionConfig::build(
        SamplingRadius::new(sampling_radius(matches))?,
        scan_passes(matches),
        ScanPoller::with_timeout(scan_timeout(matches)),
    )
}

fn plan_path(matches: &ArgMatches) -> Option<&Path> {
    matches
        .get_one::<PathBuf>(ARG_PLAN)
        .map(|p| &**p)
}

fn map_path(matches: &ArgMatches) -> Option<&Path> {
    matches
        .get_one::<PathBuf>(ARG_MAP)
        .map(|p| &**p)
}

fn output_directory(matches: &ArgMatches) -> Option<&Path> {
    matches
        .get_one::<PathBuf>(ARG_JSON_OUTPUT)
        .map(|p| &**p)
}

fn network_name(matches: &ArgMatches) -> Option<&str> {
    matches
        .get_one::<String>(ARG_NETWORK)
        .map(String::as_str)
}

fn sampling_radius(matches: &ArgMatches) -> Meter {
    matches
        .get_one::<Meter>(ARG_RADIUS)
        .copied()
        .unwrap_or(DEFAULT_SAMPLING_RADIUS)
}

fn scan_passes(matches: &ArgMatches) -> usize {
    matches
        .get_one::<usize>(ARG_PASSES)
        .copied()
        .unwrap_or(DEFAULT_SCAN_PASSES.get())
}

fn scan_timeout(matches: &ArgMatches) -> Millisecond {
    matches
        .get_one::<Millisecond>(ARG_SCAN_TIMEOUT)
        .copied()
        .unwrap_or(DEFAULT_SCAN_TIMEOUT_MS)
}

fn noise(matches: &ArgMatches) -> Dbm {
    matches
        .get_one::<Dbm>(ARG_NOISE)
        .copied()
        .unwrap_or_default()
}

fn valid_noise(noise: Dbm) -> Option<Dbm> {
    (0.0..=MAX_NOISE)
        .contains(&noise)
        .then_some(noise)
}

fn verbose(matches: &ArgMatches) -> bool {
    matches.get_flag(ARG_VERBOSE)
}
