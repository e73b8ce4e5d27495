mod app;
mod cli;
mod effects;
mod logging;
mod render;
mod settings;

use std::process::ExitCode;

use autopilot_logging::autopilot_error;
use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::initialize(cli.verbose);

    match app::run(cli) {
        Ok(code) => code,
        Err(err) => {
            autopilot_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
