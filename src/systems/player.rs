use glam::Vec3;
use hecs::World;
use tracing::{debug, info};

use crate::components::{Lifecycle, Player};
use crate::config::{Config, PhysicsConfig, PlayerConfig};
use crate::engine::input::InputIntent;
use crate::engine::time::SimClock;
use crate::events::{DeathCause, GameEvent};

use super::collision::{has_support_below, query_collisions};
use super::resolve::resolve_collisions;

// ---------------------------------------------------------------------------
// Lifecycle transitions
// ---------------------------------------------------------------------------

impl Player {
    /// Start the death animation.
    ///
    /// Returns `false` and leaves the player untouched while invulnerable or
    /// already dying, so a death is reported at most once.
    pub fn die(&mut self, cause: DeathCause) -> bool {
        if !matches!(self.lifecycle.state, Lifecycle::Alive) {
            return false;
        }
        self.lifecycle.go(Lifecycle::Dying { cause });
        self.velocity = Vec3::ZERO;
        self.flags.is_jumping = false;
        self.flags.is_on_platform = false;
        info!(?cause, position = %self.position, "player died");
        true
    }

    /// Back to the start point with a clean slate and a grace window that
    /// ends at `invulnerable_until`.
    pub fn respawn(&mut self, invulnerable_until: f64) {
        self.position = self.start_position;
        self.velocity = Vec3::ZERO;
        self.flags = Default::default();
        self.yaw = 0.0;
        self.lifecycle.force_go(Lifecycle::Invulnerable {
            until: invulnerable_until,
        });
        info!(until = invulnerable_until, "player respawned");
    }
}

// ---------------------------------------------------------------------------
// Per-tick update
// ---------------------------------------------------------------------------

/// Advance the player by one tick.
///
/// Dying players only play the death animation. Everyone else goes through
/// input, jump, gravity, integration, collision response, platform carry,
/// facing and friction, in that order.
pub fn player_system(
    world: &mut World,
    player: &mut Player,
    input: &InputIntent,
    clock: &SimClock,
    config: &Config,
    events: &mut Vec<GameEvent>,
) {
    player.lifecycle.tick(clock.dt);

    if let Lifecycle::Invulnerable { until } = player.lifecycle.state {
        if clock.now >= until {
            player.lifecycle.go(Lifecycle::Alive);
            debug!("invulnerability ended");
        }
    }

    if player.is_dying() {
        dying_step(player, &config.player, clock, events);
        return;
    }

    alive_step(world, player, input, clock.now, config, events);
}

fn dying_step(player: &mut Player, tuning: &PlayerConfig, clock: &SimClock, events: &mut Vec<GameEvent>) {
    player.yaw += tuning.death_spin_rate * clock.dt;
    player.position.y -= tuning.death_sink_rate * clock.dt;

    if player.lifecycle.expired(tuning.death_duration_secs) {
        player.respawn(clock.after(tuning.invulnerability_secs));
        events.push(GameEvent::Respawned);
    }
}

fn alive_step(
    world: &mut World,
    player: &mut Player,
    input: &InputIntent,
    now: f64,
    config: &Config,
    events: &mut Vec<GameEvent>,
) {
    let physics = &config.physics;
    let tuning = &config.player;
    let settings = physics.collision_settings();
    let rest = physics.rest_height();

    apply_input(player, input, tuning);

    if input.jump && !player.flags.jump_on_cooldown(now) {
        player.velocity.y = tuning.jump_velocity;
        player.flags.is_jumping = true;
        player.flags.is_on_platform = false;
        player.flags.jump_ready_at = now + tuning.jump_cooldown_secs as f64;
        debug!(position = %player.position, "jump");
        events.push(GameEvent::Jumped);
    }

    let supported = player.position.y <= rest
        || has_support_below(world, player.position, &player.footprint, &settings);

    if !supported {
        player.velocity.y -= physics.gravity;
        player.flags.is_on_platform = false;
    } else if player.flags.is_on_platform && !player.flags.is_jumping {
        // Keep pressing into the platform so the top-band test keeps firing.
        player.velocity.y = -physics.sticky_velocity;
    }

    let mut next = player.position + player.velocity;
    if next.y <= rest {
        next.y = rest;
        player.velocity.y = 0.0;
        player.flags.is_jumping = false;
        player.flags.is_on_platform = false;
    }

    let hits = query_collisions(world, next, &player.footprint, &settings);
    player.position = next;

    if !hits.is_empty() {
        let was_riding = player.flags.is_on_platform;
        let resolution = resolve_collisions(world, player, &hits, physics, events);
        if player.is_dying() {
            return;
        }
        if resolution.on_platform && !player.flags.is_jumping {
            player.flags.is_on_platform = true;
            if let Some(carry) = resolution.platform_velocity {
                player.position += carry * physics.carry_factor;
            }
            if player.velocity.y < 0.0 {
                player.velocity.y = 0.0;
            }
            match resolution.platform {
                Some(entity) if !was_riding => {
                    debug!(?entity, "landed on platform");
                    events.push(GameEvent::LandedOnPlatform { entity });
                }
                _ => {}
            }
        }
    } else if !player.flags.is_jumping {
        player.flags.is_on_platform = false;
    }

    if player.velocity.length_squared() > tuning.facing_epsilon {
        player.yaw = player.velocity.x.atan2(player.velocity.z);
    }

    apply_friction(player, input, physics);

    if player.flags.is_jumping && supported && player.velocity.y <= 0.0 {
        player.flags.is_jumping = false;
    }
}

fn apply_input(player: &mut Player, input: &InputIntent, tuning: &PlayerConfig) {
    let speed = if player.flags.is_on_platform {
        tuning.move_speed * tuning.platform_speed_multiplier
    } else {
        tuning.move_speed
    };
    let cap = tuning.max_lateral_speed;
    let v = &mut player.velocity;

    if input.left {
        v.x = (v.x - speed).max(-cap);
    }
    if input.right {
        v.x = (v.x + speed).min(cap);
    }
    if input.forward {
        v.z = (v.z - speed).max(-cap);
    }
    if input.back {
        v.z = (v.z + speed).min(cap);
    }
}

/// Decay lateral velocity on axes with no input held.
fn apply_friction(player: &mut Player, input: &InputIntent, physics: &PhysicsConfig) {
    let friction = if player.flags.is_on_platform {
        physics.platform_friction
    } else {
        physics.ground_friction
    };
    if !input.left && !input.right {
        player.velocity.x *= friction;
    }
    if !input.forward && !input.back {
        player.velocity.z *= friction;
    }
}
