use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use leapfrog::app::GameApp;
use leapfrog::cli::CliArgs;
use leapfrog::engine::input::InputScript;
use leapfrog::logging::init_logging;
use leapfrog::sim::Simulation;
use leapfrog::Config;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(|| PathBuf::from("."));

    let loaded = Config::load_or_create(&config_dir);
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    config.apply_cli_overrides(&args);
    init_logging(&config.debug.log_level);

    if let Err(e) = &loaded {
        warn!("using default config: {e}");
    }

    let script = match args.script.parse::<InputScript>() {
        Ok(script) => script.repeating(args.repeat),
        Err(e) => {
            error!("bad --script: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (sim, level) = match Simulation::new(config) {
        Ok(built) => built,
        Err(e) => {
            error!("level failed to load: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(?level, dir = %config_dir.display(), "starting");

    let mut app = GameApp::new(sim, script).watch_config(config_dir);
    let summary = app.run_headless(args.seconds, args.realtime);
    println!(
        "ticks={} deaths={} pickups={} final=({:.2}, {:.2}, {:.2})",
        summary.ticks,
        summary.deaths(),
        summary.pickups,
        summary.final_position.x,
        summary.final_position.y,
        summary.final_position.z,
    );
    ExitCode::SUCCESS
}
