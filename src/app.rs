use std::path::PathBuf;
use std::time::Duration;

use glam::Vec3;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::input::InputScript;
use crate::engine::time::FrameTimer;
use crate::error::ShapeError;
use crate::events::{DeathCause, GameEvent};
use crate::sim::Simulation;

/// Longest wall-clock frame fed to the accumulator. Longer stalls are
/// dropped instead of replayed tick by tick.
const MAX_FRAME_DT: f32 = 0.25;

/// Tallies of one run, logged at the end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub drownings: u32,
    pub hazard_deaths: u32,
    pub respawns: u32,
    pub pickups: u32,
    pub jumps: u32,
    pub landings: u32,
    pub final_position: Vec3,
}

impl RunSummary {
    pub fn deaths(&self) -> u32 {
        self.drownings + self.hazard_deaths
    }

    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Died { cause: DeathCause::Drowned } => self.drownings += 1,
            GameEvent::Died { cause: DeathCause::Hazard } => self.hazard_deaths += 1,
            GameEvent::Respawned => self.respawns += 1,
            GameEvent::Collected { .. } => self.pickups += 1,
            GameEvent::Jumped => self.jumps += 1,
            GameEvent::LandedOnPlatform { .. } => self.landings += 1,
        }
    }
}

/// Headless driver: feeds scripted input into the simulation at a fixed step.
pub struct GameApp {
    sim: Simulation,
    script: InputScript,
    physics_accum: f32,
    summary: RunSummary,
    events: Vec<GameEvent>,
    config_dir: Option<PathBuf>,
    next_reload_at: f64,
}

impl GameApp {
    pub fn new(sim: Simulation, script: InputScript) -> Self {
        Self {
            sim,
            script,
            physics_accum: 0.0,
            summary: RunSummary::default(),
            events: Vec::new(),
            config_dir: None,
            next_reload_at: 1.0,
        }
    }

    /// Re-read `config.ron` from `dir` once per simulated second and apply
    /// any changes between ticks.
    pub fn watch_config(mut self, dir: PathBuf) -> Self {
        self.config_dir = Some(dir);
        self
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Run until `seconds` of simulated time have passed.
    ///
    /// With `realtime` the accumulator is fed from the wall clock, otherwise
    /// each frame is exactly one fixed step and the run goes as fast as it can.
    pub fn run_headless(&mut self, seconds: f32, realtime: bool) -> RunSummary {
        let end = seconds as f64;
        let fixed_dt = self.sim.config.physics.fixed_dt;
        let mut timer = FrameTimer::new();

        info!(seconds, realtime, "run started");
        while self.sim.clock.now < end {
            let frame_dt = if realtime {
                std::thread::sleep(Duration::from_secs_f32(fixed_dt * 0.5));
                timer.tick();
                timer.dt.min(MAX_FRAME_DT)
            } else {
                fixed_dt
            };
            self.update(frame_dt, end);
        }

        self.summary.ticks = self.sim.clock.ticks;
        self.summary.final_position = self.sim.player.position;
        info!(
            ticks = self.summary.ticks,
            deaths = self.summary.deaths(),
            drownings = self.summary.drownings,
            hazard_deaths = self.summary.hazard_deaths,
            pickups = self.summary.pickups,
            jumps = self.summary.jumps,
            final_position = %self.summary.final_position,
            "run finished"
        );
        self.summary
    }

    /// Accumulate `dt` and run as many fixed ticks as it covers.
    fn update(&mut self, dt: f32, end: f64) {
        let fixed_dt = self.sim.config.physics.fixed_dt;
        self.physics_accum += dt;
        while self.physics_accum >= fixed_dt && self.sim.clock.now < end {
            self.tick();
            self.physics_accum -= fixed_dt;
        }
    }

    fn tick(&mut self) {
        let intent = self.script.intent_at(self.sim.clock.now);
        self.events.clear();
        self.sim.step(&intent, &mut self.events);

        for event in &self.events {
            debug!(tick = self.sim.clock.ticks, ?event, "event");
            self.summary.record(event);
        }

        if self.sim.clock.now >= self.next_reload_at {
            self.next_reload_at += 1.0;
            self.poll_config();
        }
    }

    fn poll_config(&mut self) {
        let Some(dir) = &self.config_dir else {
            return;
        };
        match self.sim.config.reload(dir) {
            Ok(Some(config)) => self.sim.apply_config(config),
            Ok(None) => {}
            Err(e) => warn!("config reload failed, keeping current: {e}"),
        }
    }
}

/// Convenience for callers that only have a config and a script.
pub fn run_headless(config: Config, script: InputScript, seconds: f32) -> Result<RunSummary, ShapeError> {
    let (sim, _) = Simulation::new(config)?;
    Ok(GameApp::new(sim, script).run_headless(seconds, false))
}
