use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

use crate::backend::mathphysics::{Dbm, Meter, Millisecond};

use args::{
    handle_arguments, ARG_JSON_OUTPUT, ARG_MAP, ARG_NETWORK, ARG_NOISE,
    ARG_PASSES, ARG_PLAN, ARG_RADIUS, ARG_SCAN_TIMEOUT, ARG_VERBOSE,
    DEFAULT_NOISE, DEFAULT_PASSES, DEFAULT_RADIUS, DEFAULT_SCAN_TIMEOUT
};


mod args;


pub fn cli() {
    let matches = Command::new("wifi_heatmap")
        .version("0.1.0")
        .about("Builds WiFi signal heatmaps from survey measurements.")
        .args([
            arg_plan(),
            arg_map(),
            arg_radius(),
            arg_passes(),
            arg_network(),
            arg_json_output(),
            arg_scan_timeout(),
            arg_noise(),
            arg_verbose(),
        ])
        .arg_required_else_help(true)
        .get_matches();

    handle_arguments(&matches);
}

fn arg_plan() -> Arg {
    Arg::new(ARG_PLAN)
        .long("plan")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Replay the survey described in `.json` file")
}

fn arg_map() -> Arg {
    Arg::new(ARG_MAP)
        .long("map")
        .value_parser(value_parser!(PathBuf))
        .help("Take the map size from image file instead of the survey plan")
}

fn arg_radius() -> Arg {
    Arg::new(ARG_RADIUS)
        .short('r')
        .long("radius")
        .value_parser(value_parser!(Meter))
        .default_value(DEFAULT_RADIUS)
        .help("Set the sampling radius (from 1 to 100, in meters)")
}

fn arg_passes() -> Arg {
    Arg::new(ARG_PASSES)
        .short('p')
        .long("passes")
        .value_parser(value_parser!(usize))
        .default_value(DEFAULT_PASSES)
        .help("Set the number of scans averaged per location (positive integer)")
}

fn arg_network() -> Arg {
    Arg::new(ARG_NETWORK)
        .short('n')
        .long("network")
        .help("Interpolate only this network (all networks by default)")
}

fn arg_json_output() -> Arg {
    Arg::new(ARG_JSON_OUTPUT)
        .long("jo")
        .value_parser(value_parser!(PathBuf))
        .help(
            "Serialize measurements and interpolated fields to `.json` files \
            in specified directory"
        )
}

fn arg_scan_timeout() -> Arg {
    Arg::new(ARG_SCAN_TIMEOUT)
        .long("scan-timeout")
        .value_parser(value_parser!(Millisecond))
        .default_value(DEFAULT_SCAN_TIMEOUT)
        .help("Set how long to wait for one scan (non-negative integer, in millis)")
}

fn arg_noise() -> Arg {
    Arg::new(ARG_NOISE)
        .long("noise")
        .value_parser(value_parser!(Dbm))
        .default_value(DEFAULT_NOISE)
        .help("Set the simulated scanner noise amplitude (in dBm)")
}

fn arg_verbose() -> Arg {
    Arg::new(ARG_VERBOSE)
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue)
        .help("Show full log output")
}
