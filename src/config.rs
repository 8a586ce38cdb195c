//! Tuning values with source-game defaults and RON persistence.
//!
//! Velocities and accelerations are expressed per fixed tick (the game was
//! tuned at 60 Hz); durations are in seconds of simulated time.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::Footprint;
use crate::error::ConfigError;
use crate::systems::CollisionSettings;

const CONFIG_FILE: &str = "config.ron";

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World physics and collision tolerances.
    pub physics: PhysicsConfig,
    /// Player movement, jump, and death/respawn timings.
    pub player: PlayerConfig,
    /// Lane layout parameters.
    pub level: LevelConfig,
    /// Logging and diagnostics.
    pub debug: DebugConfig,
}

/// Physics and collision tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed simulation step in seconds.
    pub fixed_dt: f32,
    /// Downward velocity added per tick while unsupported.
    pub gravity: f32,
    /// World Y of the ground plane. The player rests at `ground_level + 0.5`.
    pub ground_level: f32,
    /// Lateral velocity multiplier per tick on the ground with no input held.
    pub ground_friction: f32,
    /// Lateral velocity multiplier per tick while riding a platform with no input held.
    pub platform_friction: f32,
    /// Constant downward velocity applied while riding, keeping the rider in contact.
    pub sticky_velocity: f32,
    /// Fraction of the platform's per-tick velocity carried over to the rider.
    pub carry_factor: f32,
    /// Gap left between a platform top and the rider's feet after a snap.
    pub snap_clearance: f32,
    /// How far below the player the support probe looks.
    pub support_probe: f32,
    /// Band around a top surface inside which a contact counts as standing on it.
    pub on_top_tolerance: f32,
    /// Fixed penetration depth reported by box contacts.
    pub box_penetration: f32,
    /// Let sphere platforms report `is_on_top`. Off by default, matching the
    /// source game where turtles could only be bumped, never ridden.
    pub sphere_reports_on_top: bool,
}

/// Player controller tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Lateral velocity gained per tick while a direction is held.
    pub move_speed: f32,
    /// Absolute cap on lateral velocity per axis.
    pub max_lateral_speed: f32,
    /// Move-speed multiplier while riding a platform.
    pub platform_speed_multiplier: f32,
    /// Vertical velocity set by a jump.
    pub jump_velocity: f32,
    /// Seconds before another jump is accepted.
    pub jump_cooldown_secs: f32,
    /// Collision box used for every narrow-phase test.
    pub footprint: Footprint,
    /// Spawn and respawn point.
    pub start_position: Vec3,
    /// Length of the spin-and-sink death animation.
    pub death_duration_secs: f32,
    /// Length of the post-respawn window in which deaths are ignored.
    pub invulnerability_secs: f32,
    /// Yaw spin rate during the death animation (rad/s).
    pub death_spin_rate: f32,
    /// Sink rate during the death animation (units/s).
    pub death_sink_rate: f32,
    /// Squared speed above which facing follows velocity.
    pub facing_epsilon: f32,
}

/// Lane layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LevelConfig {
    /// Left wrap bound for lane traffic.
    pub min_x: f32,
    /// Right wrap bound for lane traffic.
    pub max_x: f32,
    /// Seed for turtle dive timers.
    pub seed: u64,
    /// World positions of one-shot pickups.
    pub collectibles: Vec<Vec3>,
}

/// Logging and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter used when `RUST_LOG` is not set (e.g. "info", "leapfrog=debug").
    pub log_level: String,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            gravity: 0.002,
            ground_level: -0.5,
            ground_friction: 0.95,
            platform_friction: 0.8,
            sticky_velocity: 0.05,
            carry_factor: 0.95,
            snap_clearance: 0.01,
            support_probe: 0.1,
            on_top_tolerance: 0.1,
            box_penetration: 0.1,
            sphere_reports_on_top: false,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.015,
            max_lateral_speed: 0.2,
            platform_speed_multiplier: 1.2,
            jump_velocity: 0.06,
            jump_cooldown_secs: 0.5,
            footprint: Footprint::default(),
            start_position: Vec3::new(0.0, 0.0, 42.0),
            death_duration_secs: 1.0,
            invulnerability_secs: 1.0,
            death_spin_rate: 10.0,
            death_sink_rate: 2.0,
            facing_epsilon: 0.0001,
        }
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            min_x: -25.0,
            max_x: 25.0,
            seed: 0x5eed_f00d,
            collectibles: vec![
                Vec3::new(0.0, 0.0, 25.0),
                Vec3::new(-6.0, 0.0, 10.0),
                Vec3::new(6.0, 0.0, -5.0),
            ],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl PhysicsConfig {
    /// Narrow-phase tolerances derived from this config.
    pub fn collision_settings(&self) -> CollisionSettings {
        CollisionSettings {
            on_top_tolerance: self.on_top_tolerance,
            box_penetration: self.box_penetration,
            support_probe: self.support_probe,
            sphere_reports_on_top: self.sphere_reports_on_top,
        }
    }

    /// Height at which the player's center rests on the bare ground.
    pub fn rest_height(&self) -> f32 {
        self.ground_level + 0.5
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            tracing::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            tracing::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            tracing::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        positive("physics.fixed_dt", p.fixed_dt)?;
        non_negative("physics.gravity", p.gravity)?;
        finite("physics.ground_level", p.ground_level)?;
        unit("physics.ground_friction", p.ground_friction)?;
        unit("physics.platform_friction", p.platform_friction)?;
        non_negative("physics.sticky_velocity", p.sticky_velocity)?;
        unit("physics.carry_factor", p.carry_factor)?;
        non_negative("physics.snap_clearance", p.snap_clearance)?;
        positive("physics.support_probe", p.support_probe)?;
        positive("physics.on_top_tolerance", p.on_top_tolerance)?;
        non_negative("physics.box_penetration", p.box_penetration)?;

        let pl = &self.player;
        non_negative("player.move_speed", pl.move_speed)?;
        positive("player.max_lateral_speed", pl.max_lateral_speed)?;
        positive("player.platform_speed_multiplier", pl.platform_speed_multiplier)?;
        non_negative("player.jump_velocity", pl.jump_velocity)?;
        non_negative("player.jump_cooldown_secs", pl.jump_cooldown_secs)?;
        positive("player.footprint.width", pl.footprint.width)?;
        positive("player.footprint.height", pl.footprint.height)?;
        positive("player.footprint.depth", pl.footprint.depth)?;
        if !pl.start_position.is_finite() {
            return Err(ConfigError::Invalid {
                field: "player.start_position",
                reason: "must be finite",
            });
        }
        positive("player.death_duration_secs", pl.death_duration_secs)?;
        non_negative("player.invulnerability_secs", pl.invulnerability_secs)?;
        finite("player.death_spin_rate", pl.death_spin_rate)?;
        finite("player.death_sink_rate", pl.death_sink_rate)?;
        non_negative("player.facing_epsilon", pl.facing_epsilon)?;

        let l = &self.level;
        finite("level.min_x", l.min_x)?;
        finite("level.max_x", l.max_x)?;
        if l.min_x >= l.max_x {
            return Err(ConfigError::Invalid {
                field: "level.min_x",
                reason: "must be less than level.max_x",
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be finite" })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be >= 0" })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be > 0" })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    non_negative(field, value)?;
    if value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: "must be <= 1" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_source_tuning() {
        let config = Config::default();
        assert_eq!(config.physics.gravity, 0.002);
        assert_eq!(config.physics.ground_level, -0.5);
        assert_eq!(config.physics.platform_friction, 0.8);
        assert_eq!(config.physics.ground_friction, 0.95);
        assert_eq!(config.player.jump_cooldown_secs, 0.5);
        assert_eq!(config.player.max_lateral_speed, 0.2);
        assert_eq!(config.player.start_position, Vec3::new(0.0, 0.0, 42.0));
        assert!(!config.physics.sphere_reports_on_top);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(physics: (gravity: 0.004))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.physics.gravity, 0.004);
        assert_eq!(config.physics.ground_level, -0.5);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.player.jump_velocity = 0.08;
        config.level.seed = 7;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut modified = config.clone();
        modified.physics.gravity = 0.003;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().physics.gravity, 0.003);
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.physics.ground_friction = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "physics.ground_friction", .. })
        ));

        let mut config = Config::default();
        config.player.footprint.height = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.physics.gravity = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.level.min_x = 30.0;
        assert!(config.validate().is_err());
    }
}
