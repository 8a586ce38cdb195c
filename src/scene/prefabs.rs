use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use hecs::{Entity, World};

use crate::components::*;
use crate::error::ShapeError;
use crate::systems::{spawn_object, WorldObject};

// ---------------------------------------------------------------------------
// Lane furniture proportions
// ---------------------------------------------------------------------------

/// Y of every moving object's center; matches the ground plane.
pub const LANE_Y: f32 = -0.5;

const WATER_Y: f32 = -0.49;
const WATER_HALF: Vec3 = Vec3::new(50.0, 0.05, 2.5);

const LOG_RADIUS: f32 = 1.0;
const LOG_LENGTH: f32 = 5.0;
const LOG_SPEED: f32 = 0.02;

const TURTLE_RADIUS: f32 = 0.9;
const TURTLES_PER_GROUP: usize = 3;
const TURTLE_SPACING: f32 = 1.9;
const TURTLE_SWAY: f32 = 3.0;
const TURTLE_SWAY_FREQUENCY: f32 = 0.008;

const CAR_HALF: Vec3 = Vec3::new(1.0, 0.75, 2.0);
const CAR_SPEED: f32 = 0.2;

const COLLECTIBLE_RADIUS: f32 = 0.3;

/// Invisible water slab covering one lane. Not moving, so no lane component.
pub fn spawn_water_lane(world: &mut World, lane_z: f32) -> Result<Entity, ShapeError> {
    spawn_object(
        world,
        WorldObject::new(
            Collider::cuboid(WATER_HALF)?,
            Category::Water,
            Vec3::new(0.0, WATER_Y, lane_z),
        ),
    )
}

/// A log lying across the lane (cylinder axis along world X), drifting in
/// `direction`.
pub fn spawn_log(world: &mut World, x: f32, lane_z: f32, direction: f32) -> Result<Entity, ShapeError> {
    // Local Y -> world X.
    let lying = Quat::from_rotation_x(-FRAC_PI_2) * Quat::from_rotation_z(-FRAC_PI_2);
    let transform = LocalTransform::new(Vec3::new(x, LANE_Y, lane_z)).with_rotation(lying);
    let log = spawn_object(
        world,
        WorldObject::new(Collider::cylinder(LOG_RADIUS, LOG_LENGTH)?, Category::Platform, transform.position)
            .with_transform(transform),
    )?;
    insert(
        world,
        log,
        (LaneMotion {
            direction,
            speed: LOG_SPEED,
            lane_z,
        },),
    );
    Ok(log)
}

/// A row of turtles centered on `x`, each swaying around its own spawn X and
/// diving on its own timer.
pub fn spawn_turtle_group(
    world: &mut World,
    x: f32,
    lane_z: f32,
    first_dives: [f32; TURTLES_PER_GROUP],
) -> Result<Vec<Entity>, ShapeError> {
    let collider = Collider::sphere(TURTLE_RADIUS)?;
    let mut turtles = Vec::with_capacity(TURTLES_PER_GROUP);

    for (i, first_dive) in first_dives.into_iter().enumerate() {
        let offset = (i as f32 - (TURTLES_PER_GROUP - 1) as f32 / 2.0) * TURTLE_SPACING;
        let pos = Vec3::new(x + offset, LANE_Y, lane_z);
        let turtle = spawn_object(world, WorldObject::new(collider, Category::Platform, pos))?;
        insert(
            world,
            turtle,
            (
                Oscillation {
                    origin_x: pos.x,
                    distance: TURTLE_SWAY,
                    frequency: TURTLE_SWAY_FREQUENCY,
                    time: 0.0,
                },
                DiveCycle::new(LANE_Y, first_dive),
            ),
        );
        turtles.push(turtle);
    }
    Ok(turtles)
}

/// A car: box hazard facing its travel direction.
pub fn spawn_car(world: &mut World, x: f32, lane_z: f32, direction: f32) -> Result<Entity, ShapeError> {
    let heading = if direction < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
    let transform =
        LocalTransform::new(Vec3::new(x, LANE_Y, lane_z)).with_rotation(Quat::from_rotation_y(heading));
    let car = spawn_object(
        world,
        WorldObject::new(Collider::cuboid(CAR_HALF)?, Category::Hazard, transform.position)
            .with_transform(transform),
    )?;
    insert(
        world,
        car,
        (LaneMotion {
            direction,
            speed: CAR_SPEED,
            lane_z,
        },),
    );
    Ok(car)
}

/// One-shot pickup.
pub fn spawn_collectible(world: &mut World, pos: Vec3) -> Result<Entity, ShapeError> {
    spawn_object(
        world,
        WorldObject::new(Collider::sphere(COLLECTIBLE_RADIUS)?, Category::Collectible, pos),
    )
}

/// Static box. Walking into it does nothing; its top supports the player.
pub fn spawn_obstacle_box(world: &mut World, pos: Vec3, half_extents: Vec3) -> Result<Entity, ShapeError> {
    spawn_object(
        world,
        WorldObject::new(Collider::cuboid(half_extents)?, Category::Obstacle, pos),
    )
}

fn insert(world: &mut World, entity: Entity, components: impl hecs::DynamicBundle) {
    // Entity comes straight from spawn_object.
    let _ = world.insert(entity, components);
}
