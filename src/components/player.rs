use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::events::DeathCause;
use crate::fsm::StateMachine;

/// The player's collision box, used unchanged by every narrow-phase test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
    }
}

impl Footprint {
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Horizontal reach used against spheres.
    pub fn horizontal_radius(&self) -> f32 {
        self.width.max(self.depth) * 0.5
    }
}

/// Movement flags carried between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionFlags {
    pub is_jumping: bool,
    pub is_on_platform: bool,
    /// Simulation time at which the next jump is accepted.
    pub jump_ready_at: f64,
}

impl MotionFlags {
    pub fn jump_on_cooldown(&self, now: f64) -> bool {
        now < self.jump_ready_at
    }
}

/// Player lifecycle.
///
/// Transition rules live in `src/systems/player.rs`; this file stays pure data.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle {
    /// Steady state: input, physics, and death conditions all apply.
    Alive,
    /// Playing the death animation. Input and physics are ignored.
    Dying { cause: DeathCause },
    /// Alive, but death conditions are ignored until `until` (simulation seconds).
    Invulnerable { until: f64 },
}

/// FSM tracking the player's lifecycle and time spent in it.
pub type PlayerFsm = StateMachine<Lifecycle>;

/// The controlled entity.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    /// Units per tick.
    pub velocity: Vec3,
    pub footprint: Footprint,
    pub flags: MotionFlags,
    pub lifecycle: PlayerFsm,
    /// Facing angle around Y, for the presentation layer.
    pub yaw: f32,
    pub start_position: Vec3,
}

impl Player {
    pub fn new(start_position: Vec3, footprint: Footprint) -> Self {
        Self {
            position: start_position,
            velocity: Vec3::ZERO,
            footprint,
            flags: MotionFlags::default(),
            lifecycle: PlayerFsm::new(Lifecycle::Alive),
            yaw: 0.0,
            start_position,
        }
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.lifecycle.state, Lifecycle::Dying { .. })
    }

    pub fn is_invulnerable(&self) -> bool {
        matches!(self.lifecycle.state, Lifecycle::Invulnerable { .. })
    }
}
