mod collision;
mod movement;
mod narrowphase;
mod player;
mod resolve;

pub use collision::{
    bounds_system, check_collision, has_support_below, query_collisions, remove_object,
    spawn_object, WorldObject,
};
pub use movement::{dive_system, lane_movement_system, next_dive_delay};
pub use narrowphase::{contact, CollisionSettings, Contact};
pub use player::player_system;
pub use resolve::{resolve_collisions, Resolution};
