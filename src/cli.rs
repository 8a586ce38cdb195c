//! Command-line arguments for the headless runner.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Leapfrog lane-crossing simulation.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "leapfrog", about = "Leapfrog lane-crossing simulation")]
pub struct CliArgs {
    /// Seconds of simulated time to run.
    #[arg(long, default_value_t = 10.0)]
    pub seconds: f32,

    /// Scripted input, e.g. "forward:0.6,idle:1,jump:0.1".
    #[arg(long, default_value = "forward:0.4,idle:0.8")]
    pub script: String,

    /// Repeat the script until the run ends.
    #[arg(long)]
    pub repeat: bool,

    /// Run in real time instead of as fast as possible.
    #[arg(long)]
    pub realtime: bool,

    /// Seed for turtle dive timers.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides the working directory).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.level.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
