//! Logger setup for the `autopilot` binary.
//!
//! Logs go to `./autopilot.log` in the current working directory; with
//! `--verbose` they are mirrored to the terminal as well.

use std::path::Path;

use autopilot_logging::LogDestination;
use log::LevelFilter;

const LOG_FILE: &str = "./autopilot.log";

pub fn initialize(verbose: bool) {
    let path = Path::new(LOG_FILE);
    let (destination, level) = if verbose {
        (LogDestination::Both(path), LevelFilter::Debug)
    } else {
        (LogDestination::File(path), LevelFilter::Info)
    };
    autopilot_logging::initialize(destination, level);
}
