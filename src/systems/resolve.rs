use glam::Vec3;
use hecs::{Entity, World};
use tracing::{debug, info, trace};

use crate::components::{Aabb, Category, Collider, Hit, LocalTransform, Player, Velocity};
use crate::config::PhysicsConfig;
use crate::events::{DeathCause, GameEvent};

use super::collision::remove_object;

/// What the integrator needs back from a resolve pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Resolution {
    pub on_platform: bool,
    /// The platform the player was snapped onto, if any.
    pub platform: Option<Entity>,
    /// That platform's velocity this tick, in units per tick.
    pub platform_velocity: Option<Vec3>,
}

/// Reduce one tick's hits to effects on the player.
///
/// Platform landing is decided first so that water underneath a ridden
/// platform is ignored in the second pass. Hazards are fatal either way.
/// Collectibles are removed only after the scan over `hits` completes.
pub fn resolve_collisions(
    world: &mut World,
    player: &mut Player,
    hits: &[Hit],
    physics: &PhysicsConfig,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    let mut resolution = Resolution::default();

    // Pass 1: land on the highest platform whose top we are touching.
    let mut best_top = f32::NEG_INFINITY;
    for hit in hits {
        if hit.result.category != Category::Platform || !hit.result.is_on_top {
            continue;
        }
        let Some((top, velocity)) = platform_top(world, hit.entity) else {
            continue;
        };
        if top > best_top {
            best_top = top;
            resolution.on_platform = true;
            resolution.platform = Some(hit.entity);
            resolution.platform_velocity = Some(velocity);
        }
    }
    if resolution.on_platform {
        let snapped = best_top + player.footprint.half_height() + physics.snap_clearance;
        debug!(
            platform = ?resolution.platform,
            from = player.position.y,
            to = snapped,
            "snapped onto platform"
        );
        player.position.y = snapped;
    }

    // Pass 2: water, hazards, side contacts, pickups.
    let mut in_water = false;
    let mut hit_hazard = false;
    let mut collected: Vec<Entity> = Vec::new();

    for hit in hits {
        match hit.result.category {
            Category::Water => {
                if !resolution.on_platform {
                    in_water = true;
                }
            }
            Category::Hazard => hit_hazard = true,
            Category::Platform => {
                if !hit.result.is_on_top {
                    player.position += hit.result.normal * hit.result.penetration_depth;
                }
            }
            Category::Collectible => {
                if !collected.contains(&hit.entity) {
                    collected.push(hit.entity);
                }
            }
            Category::Obstacle => {
                trace!(entity = ?hit.entity, "obstacle contact, no response");
            }
        }
    }

    for entity in collected {
        if remove_object(world, entity) {
            info!(?entity, "collectible picked up");
            events.push(GameEvent::Collected { entity });
        }
    }

    if hit_hazard || (in_water && !resolution.on_platform) {
        let cause = if hit_hazard {
            DeathCause::Hazard
        } else {
            DeathCause::Drowned
        };
        if player.die(cause) {
            events.push(GameEvent::Died { cause });
        }
    }

    resolution
}

/// World Y of a platform's top surface and its current velocity. Boxes use
/// their world AABB; other shapes measure along their local axis.
fn platform_top(world: &World, entity: Entity) -> Option<(f32, Vec3)> {
    let mut query = world
        .query_one::<(&LocalTransform, &Collider, Option<&Aabb>, Option<&Velocity>)>(entity)
        .ok()?;
    let (local, collider, bounds, velocity) = query.get()?;
    let top = bounds.map_or(local.position.y + collider.top_offset(), |b| b.max.y);
    Some((top, velocity.map_or(Vec3::ZERO, |v| v.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Footprint, Lifecycle};
    use crate::systems::collision::{query_collisions, spawn_object, WorldObject};
    use approx::assert_relative_eq;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn boxed(world: &mut World, category: Category, center: Vec3, half: Vec3) -> Entity {
        let collider = Collider::cuboid(half).unwrap();
        spawn_object(world, WorldObject::new(collider, category, center)).unwrap()
    }

    fn resolve_at(world: &mut World, player: &mut Player, events: &mut Vec<GameEvent>) -> Resolution {
        let physics = PhysicsConfig::default();
        let hits = query_collisions(world, player.position, &player.footprint, &physics.collision_settings());
        resolve_collisions(world, player, &hits, &physics, events)
    }

    #[test]
    fn test_platform_over_water_is_safe() {
        let mut world = World::new();
        boxed(&mut world, Category::Water, Vec3::new(0.0, -0.49, 0.0), Vec3::new(50.0, 0.05, 2.5));
        let raft = boxed(&mut world, Category::Platform, Vec3::new(0.0, -0.5, 0.0), Vec3::new(2.0, 0.5, 1.0));
        world.get::<&mut Velocity>(raft).unwrap().0 = Vec3::new(0.02, 0.0, 0.0);

        // Low enough to overlap the water plane as well as the raft.
        let mut player = Player::new(Vec3::ZERO, Footprint::default());
        let mut events = Vec::new();
        let res = resolve_at(&mut world, &mut player, &mut events);

        assert!(res.on_platform);
        assert_eq!(res.platform, Some(raft));
        assert_eq!(res.platform_velocity, Some(Vec3::new(0.02, 0.0, 0.0)));
        assert_relative_eq!(player.position.y, 0.51, epsilon = 1e-6);
        assert_eq!(player.lifecycle.state, Lifecycle::Alive);
        assert!(events.is_empty());
    }

    #[test]
    fn test_hazard_is_fatal_even_on_platform() {
        let mut world = World::new();
        boxed(&mut world, Category::Platform, Vec3::new(0.0, -0.5, 0.0), Vec3::new(2.0, 0.5, 1.0));
        boxed(&mut world, Category::Hazard, Vec3::new(0.5, 0.5, 0.0), Vec3::splat(0.5));

        let mut player = Player::new(Vec3::new(0.0, 0.46, 0.0), Footprint::default());
        let mut events = Vec::new();
        let res = resolve_at(&mut world, &mut player, &mut events);

        assert!(res.on_platform);
        assert!(player.is_dying());
        assert_eq!(events, vec![GameEvent::Died { cause: DeathCause::Hazard }]);
    }

    #[test]
    fn test_water_without_platform_drowns() {
        let mut world = World::new();
        boxed(&mut world, Category::Water, Vec3::new(0.0, -0.49, 0.0), Vec3::new(50.0, 0.05, 2.5));

        let mut player = Player::new(Vec3::ZERO, Footprint::default());
        let mut events = Vec::new();
        let res = resolve_at(&mut world, &mut player, &mut events);

        assert!(!res.on_platform);
        assert_eq!(
            player.lifecycle.state,
            Lifecycle::Dying { cause: DeathCause::Drowned }
        );
        assert_eq!(events, vec![GameEvent::Died { cause: DeathCause::Drowned }]);
    }

    #[test]
    fn test_side_contact_pushes_out() {
        let mut world = World::new();
        boxed(&mut world, Category::Platform, Vec3::ZERO, Vec3::splat(0.5));

        let mut player = Player::new(Vec3::new(0.8, 0.0, 0.0), Footprint::default());
        let mut events = Vec::new();
        let res = resolve_at(&mut world, &mut player, &mut events);

        assert!(!res.on_platform);
        assert_relative_eq!(player.position.x, 0.9, epsilon = 1e-6);
        assert_eq!(player.position.y, 0.0);
    }

    #[test]
    fn test_duplicate_collectible_hits_remove_once() {
        let mut world = World::new();
        let fly = spawn_object(
            &mut world,
            WorldObject::new(Collider::sphere(0.3).unwrap(), Category::Collectible, Vec3::ZERO),
        )
        .unwrap();
        let physics = PhysicsConfig::default();
        let mut player = Player::new(Vec3::ZERO, Footprint::default());
        let hits = query_collisions(&world, player.position, &player.footprint, &physics.collision_settings());
        assert_eq!(hits.len(), 1);
        let doubled = [hits[0], hits[0]];

        let mut events = Vec::new();
        resolve_collisions(&mut world, &mut player, &doubled, &physics, &mut events);
        assert_eq!(events, vec![GameEvent::Collected { entity: fly }]);
        assert!(!world.contains(fly));

        // Stale hits from an earlier tick are harmless too.
        resolve_collisions(&mut world, &mut player, &doubled, &physics, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_highest_platform_wins() {
        let mut world = World::new();
        boxed(&mut world, Category::Platform, Vec3::new(0.0, -0.5, 0.0), Vec3::new(2.0, 0.5, 2.0));
        let upper = boxed(&mut world, Category::Platform, Vec3::new(0.0, -0.45, 0.0), Vec3::new(2.0, 0.5, 2.0));

        let mut player = Player::new(Vec3::new(0.0, 0.5, 0.0), Footprint::default());
        let mut events = Vec::new();
        let res = resolve_at(&mut world, &mut player, &mut events);

        assert_eq!(res.platform, Some(upper));
        assert_relative_eq!(player.position.y, 0.56, epsilon = 1e-6);
    }

    #[test]
    fn test_rotated_box_snaps_to_world_top() {
        let mut world = World::new();
        let column = LocalTransform::new(Vec3::ZERO).with_rotation(Quat::from_rotation_z(FRAC_PI_2));
        let collider = Collider::cuboid(Vec3::new(2.0, 0.5, 0.5)).unwrap();
        spawn_object(
            &mut world,
            WorldObject::new(collider, Category::Platform, Vec3::ZERO).with_transform(column),
        )
        .unwrap();

        let mut player = Player::new(Vec3::new(0.0, 2.45, 0.0), Footprint::default());
        let mut events = Vec::new();
        let res = resolve_at(&mut world, &mut player, &mut events);
        assert!(res.on_platform);
        assert_relative_eq!(player.position.y, 2.51, epsilon = 1e-5);

        // Against the side of the column: pushed out, not lifted to the local top.
        let mut player = Player::new(Vec3::new(0.8, 0.5, 0.0), Footprint::default());
        let res = resolve_at(&mut world, &mut player, &mut events);
        assert!(!res.on_platform);
        assert!(player.position.x > 0.8);
        assert!(player.position.y < 0.6, "{}", player.position.y);
    }

    #[test]
    fn test_log_end_cap_snaps_to_axial_top() {
        // Axis along world X: the local "top" is the end cap at x = +2.5.
        let mut world = World::new();
        let log = LocalTransform::new(Vec3::new(0.0, -0.5, 0.0))
            .with_rotation(Quat::from_rotation_x(-FRAC_PI_2) * Quat::from_rotation_z(-FRAC_PI_2));
        let collider = Collider::cylinder(1.0, 5.0).unwrap();
        spawn_object(
            &mut world,
            WorldObject::new(collider, Category::Platform, log.position).with_transform(log),
        )
        .unwrap();

        let mut player = Player::new(Vec3::new(2.95, 0.0, 0.0), Footprint::default());
        let mut events = Vec::new();
        let res = resolve_at(&mut world, &mut player, &mut events);
        assert!(res.on_platform);
        assert_relative_eq!(player.position.y, -0.5 + 2.5 + 0.5 + 0.01, epsilon = 1e-4);
    }

    #[test]
    fn test_obstacle_contact_is_noop() {
        let mut world = World::new();
        boxed(&mut world, Category::Obstacle, Vec3::ZERO, Vec3::splat(0.5));
        let mut player = Player::new(Vec3::new(0.3, 0.0, 0.0), Footprint::default());
        let before = player.position;
        let mut events = Vec::new();
        let res = resolve_at(&mut world, &mut player, &mut events);
        assert_eq!(res, Resolution::default());
        assert_eq!(player.position, before);
        assert!(events.is_empty());
    }
}
