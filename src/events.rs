//! Gameplay events emitted by the simulation for the UI/score layer.

use hecs::Entity;

/// Why the player died.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Touched water without standing on a platform.
    Drowned,
    /// Touched a hazard, platform or not.
    Hazard,
}

/// Something that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// The player entered the death animation.
    Died { cause: DeathCause },
    /// The death animation finished and the player is back at the start.
    Respawned,
    /// A collectible was picked up and removed from the world.
    Collected { entity: Entity },
    /// The player began riding a platform this tick.
    LandedOnPlatform { entity: Entity },
    /// A jump was accepted.
    Jumped,
}
