use glam::Vec3;
use hecs::{Entity, World};
use tracing::debug;

use crate::components::{
    Aabb, Category, Collider, CollisionResult, Footprint, Hit, LocalTransform, Velocity,
};
use crate::error::ShapeError;

use super::narrowphase::{contact, CollisionSettings};

/// Everything needed to register a collidable object.
#[derive(Debug, Clone, Copy)]
pub struct WorldObject {
    pub collider: Collider,
    pub category: Category,
    pub transform: LocalTransform,
    pub velocity: Vec3,
}

impl WorldObject {
    pub fn new(collider: Collider, category: Category, position: Vec3) -> Self {
        Self {
            collider,
            category,
            transform: LocalTransform::new(position),
            velocity: Vec3::ZERO,
        }
    }

    pub fn with_transform(mut self, transform: LocalTransform) -> Self {
        self.transform = transform;
        self
    }
}

/// Register an object. Malformed shapes are rejected here so they can never
/// produce silent wrong collisions later.
pub fn spawn_object(world: &mut World, object: WorldObject) -> Result<Entity, ShapeError> {
    object.collider.validate()?;
    let entity = world.spawn((
        object.transform,
        object.collider,
        object.category,
        Velocity(object.velocity),
    ));
    if let Collider::Box { half_extents } = object.collider {
        let bounds = Aabb::from_transform(&object.transform, half_extents);
        // Entity was spawned on the line above.
        let _ = world.insert_one(entity, bounds);
    }
    debug!(?entity, category = ?object.category, shape = ?object.collider, "object added");
    Ok(entity)
}

/// Unregister an object. Returns `false` if it was already gone, so repeated
/// removal is harmless.
pub fn remove_object(world: &mut World, entity: Entity) -> bool {
    match world.despawn(entity) {
        Ok(()) => {
            debug!(?entity, "object removed");
            true
        }
        Err(_) => false,
    }
}

/// Recompute the world AABB of every box from its current transform.
/// Run after anything that moves objects and before collision queries.
pub fn bounds_system(world: &mut World) {
    for (_entity, (local, collider, bounds)) in
        world.query_mut::<(&LocalTransform, &Collider, &mut Aabb)>()
    {
        if let Collider::Box { half_extents } = *collider {
            *bounds = Aabb::from_transform(local, half_extents);
        }
    }
}

/// Test the player against one object. Returns a miss if the entity is not
/// collidable.
pub fn check_collision(
    world: &World,
    entity: Entity,
    position: Vec3,
    footprint: &Footprint,
    settings: &CollisionSettings,
) -> Option<CollisionResult> {
    let mut query = world
        .query_one::<(&LocalTransform, &Collider, &Category, Option<&Aabb>)>(entity)
        .ok()?;
    let (local, collider, category, bounds) = query.get()?;
    Some(result_for(collider, *category, local, bounds, position, footprint, settings))
}

fn result_for(
    collider: &Collider,
    category: Category,
    local: &LocalTransform,
    bounds: Option<&Aabb>,
    position: Vec3,
    footprint: &Footprint,
    settings: &CollisionSettings,
) -> CollisionResult {
    match contact(collider, local, bounds, position, footprint, settings) {
        Some(c) => CollisionResult {
            collides: true,
            category,
            normal: c.normal,
            penetration_depth: c.penetration_depth,
            is_on_top: c.is_on_top,
        },
        None => CollisionResult::miss(category),
    }
}

/// Every object overlapping a player at `position`. Order is unspecified.
pub fn query_collisions(
    world: &World,
    position: Vec3,
    footprint: &Footprint,
    settings: &CollisionSettings,
) -> Vec<Hit> {
    world
        .query::<(&LocalTransform, &Collider, &Category, Option<&Aabb>)>()
        .iter()
        .filter_map(|(entity, (local, collider, category, bounds))| {
            let result =
                result_for(collider, *category, local, bounds, position, footprint, settings);
            result.collides.then_some(Hit { entity, result })
        })
        .collect()
}

/// Whether something the player can stand on sits just below `position`.
pub fn has_support_below(
    world: &World,
    position: Vec3,
    footprint: &Footprint,
    settings: &CollisionSettings,
) -> bool {
    let probe = position - Vec3::Y * settings.support_probe;
    query_collisions(world, probe, footprint, settings)
        .iter()
        .any(|hit| {
            hit.result.is_on_top
                && matches!(hit.result.category, Category::Platform | Category::Obstacle)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CollisionSettings {
        CollisionSettings::default()
    }

    fn platform_box(world: &mut World, center: Vec3) -> Entity {
        let collider = Collider::cuboid(Vec3::new(2.0, 0.5, 2.0)).unwrap();
        spawn_object(world, WorldObject::new(collider, Category::Platform, center)).unwrap()
    }

    #[test]
    fn test_spawn_rejects_malformed_shape() {
        let mut world = World::new();
        let bad = WorldObject::new(
            Collider::Cylinder {
                radius: 1.0,
                height: 0.0,
            },
            Category::Platform,
            Vec3::ZERO,
        );
        assert_eq!(spawn_object(&mut world, bad), Err(ShapeError::Height(0.0)));
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn test_query_returns_only_hits() {
        let mut world = World::new();
        let near = platform_box(&mut world, Vec3::ZERO);
        platform_box(&mut world, Vec3::new(20.0, 0.0, 0.0));
        let hits = query_collisions(&world, Vec3::new(0.0, 0.5, 0.0), &Footprint::default(), &settings());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, near);
        assert!(hits[0].result.collides);
        assert_eq!(hits[0].result.category, Category::Platform);
    }

    #[test]
    fn test_check_collision_reports_miss() {
        let mut world = World::new();
        let e = platform_box(&mut world, Vec3::ZERO);
        let result =
            check_collision(&world, e, Vec3::new(9.0, 0.0, 0.0), &Footprint::default(), &settings())
                .unwrap();
        assert!(!result.collides);
        assert!(remove_object(&mut world, e));
        assert!(!remove_object(&mut world, e));
        assert!(check_collision(&world, e, Vec3::ZERO, &Footprint::default(), &settings()).is_none());
    }

    #[test]
    fn test_support_below_platform_top() {
        let mut world = World::new();
        platform_box(&mut world, Vec3::ZERO);
        let footprint = Footprint::default();
        // Resting 0.01 above the top face.
        assert!(has_support_below(&world, Vec3::new(0.0, 1.01, 0.0), &footprint, &settings()));
        assert!(!has_support_below(&world, Vec3::new(0.0, 1.5, 0.0), &footprint, &settings()));
        assert!(!has_support_below(&world, Vec3::new(5.0, 1.01, 0.0), &footprint, &settings()));
    }

    #[test]
    fn test_water_and_hazard_do_not_support() {
        let mut world = World::new();
        let collider = Collider::cuboid(Vec3::new(2.0, 0.5, 2.0)).unwrap();
        spawn_object(&mut world, WorldObject::new(collider, Category::Water, Vec3::ZERO)).unwrap();
        spawn_object(&mut world, WorldObject::new(collider, Category::Hazard, Vec3::ZERO)).unwrap();
        assert!(!has_support_below(&world, Vec3::new(0.0, 1.01, 0.0), &Footprint::default(), &settings()));
    }

    #[test]
    fn test_bounds_follow_transform() {
        let mut world = World::new();
        let e = platform_box(&mut world, Vec3::ZERO);
        world.get::<&mut LocalTransform>(e).unwrap().position.x = 10.0;
        bounds_system(&mut world);
        let bounds = *world.get::<&Aabb>(e).unwrap();
        assert_eq!(bounds.min.x, 8.0);
        assert_eq!(bounds.max.x, 12.0);
    }
}
