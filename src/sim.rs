use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::components::Player;
use crate::config::Config;
use crate::engine::input::InputIntent;
use crate::engine::time::SimClock;
use crate::error::ShapeError;
use crate::events::GameEvent;
use crate::scene::{load_level, LevelSummary};
use crate::systems::{bounds_system, dive_system, lane_movement_system, player_system};

/// Everything one game session owns: the object registry, the player, the
/// tuning, the clock and the seeded RNG. Passed around explicitly; there is
/// no global state.
pub struct Simulation {
    pub world: World,
    pub player: Player,
    pub config: Config,
    pub clock: SimClock,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// A session with nothing in the world but the player.
    pub fn empty(config: Config) -> Self {
        let player = Player::new(config.player.start_position, config.player.footprint);
        Self {
            world: World::new(),
            player,
            clock: SimClock::new(config.physics.fixed_dt),
            rng: ChaCha8Rng::seed_from_u64(config.level.seed),
            config,
        }
    }

    /// A session with the full lane course loaded.
    pub fn new(config: Config) -> Result<(Self, LevelSummary), ShapeError> {
        let mut sim = Self::empty(config);
        let summary = load_level(&mut sim.world, &sim.config.level, &mut sim.rng)?;
        Ok((sim, summary))
    }

    /// Run one fixed tick: lane traffic, turtle dives, bounds refresh, then
    /// the player update. Events are appended to `events`.
    pub fn step(&mut self, input: &InputIntent, events: &mut Vec<GameEvent>) {
        self.clock.advance();
        let dt = self.clock.dt;

        lane_movement_system(&mut self.world, dt, self.config.level.min_x, self.config.level.max_x);
        dive_system(&mut self.world, dt, &mut self.rng);
        bounds_system(&mut self.world);
        player_system(&mut self.world, &mut self.player, input, &self.clock, &self.config, events);
    }

    /// Swap in new tuning between ticks. Level layout and the clock step are
    /// kept as they are.
    pub fn apply_config(&mut self, config: Config) {
        if config.physics.fixed_dt != self.config.physics.fixed_dt {
            info!(
                old = self.config.physics.fixed_dt,
                new = config.physics.fixed_dt,
                "fixed_dt change takes effect on restart"
            );
        }
        let fixed_dt = self.config.physics.fixed_dt;
        self.player.footprint = config.player.footprint;
        self.player.start_position = config.player.start_position;
        self.config = config;
        self.config.physics.fixed_dt = fixed_dt;
        info!("config applied");
    }
}
