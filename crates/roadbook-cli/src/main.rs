mod error;
mod input;
mod logging;
mod output;
mod settings;

use clap::Parser;
use roadbook_lib::RoadbookAnalyzer;
use std::process::ExitCode;

use crate::error::CliError;
use crate::settings::Settings;

fn main() -> ExitCode {
    let settings = Settings::parse();
    logging::setup_logging(settings.verbose);

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<(), CliError> {
    profiling::scope!("roadbook::run");

    let config = settings.config()?;
    tracing::debug!("Configuration: {:?}", config);

    let polyline = input::load(&settings.input, settings.format)?;
    let analyzer = RoadbookAnalyzer::new(config)?;
    let roadbook = analyzer.analyze(&polyline)?;

    let info = roadbook.info();
    tracing::info!(
        "{} entries ({} turns, {} hairpins) over {:.0} m, {} sample points",
        info.entry_count,
        info.turn_count,
        info.hairpin_count,
        info.total_distance_m,
        info.sample_points
    );

    let mut out = std::io::stdout().lock();
    if settings.json {
        output::write_json(&mut out, &roadbook)
    } else {
        output::write_lines(&mut out, &roadbook)
    }
}
