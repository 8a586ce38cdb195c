use std::f32::consts::{FRAC_PI_8, TAU};

use glam::{Quat, Vec3};
use hecs::World;
use rand::Rng;
use tracing::debug;

use crate::components::{DiveCycle, DivePhase, LaneMotion, LocalTransform, Oscillation, Velocity};

// ---------------------------------------------------------------------------
// Dive timings
// ---------------------------------------------------------------------------

const SHAKE_SECS: f32 = 1.0;
const SUBMERGE_SECS: f32 = 0.5;
const SUBMERGED_SECS: f32 = 2.0;
const DIVE_DEPTH: f32 = 1.5;
const FLOAT_SECS_MIN: f32 = 5.0;
const FLOAT_SECS_MAX: f32 = 15.0;

/// Seconds a turtle floats before its next dive.
pub fn next_dive_delay(rng: &mut impl Rng) -> f32 {
    rng.random_range(FLOAT_SECS_MIN..FLOAT_SECS_MAX)
}

// ---------------------------------------------------------------------------
// Lane traffic
// ---------------------------------------------------------------------------

/// Move lane traffic one tick and publish each object's per-tick velocity.
///
/// Linear movers that leave `[min_x, max_x]` in their travel direction wrap
/// to the opposite bound. Oscillators follow a sine around their origin.
pub fn lane_movement_system(world: &mut World, dt: f32, min_x: f32, max_x: f32) {
    for (entity, (local, velocity, lane)) in
        world.query_mut::<(&mut LocalTransform, &mut Velocity, &LaneMotion)>()
    {
        let step = lane.direction * lane.speed;
        velocity.0 = Vec3::new(step, 0.0, 0.0);
        local.position.x += step;

        let wrapped = if lane.direction > 0.0 && local.position.x > max_x {
            Some(min_x)
        } else if lane.direction < 0.0 && local.position.x < min_x {
            Some(max_x)
        } else {
            None
        };
        if let Some(x) = wrapped {
            local.position.x = x;
            local.position.z = lane.lane_z;
            debug!(?entity, x, "lane object recycled");
        }
    }

    for (_entity, (local, velocity, sway)) in
        world.query_mut::<(&mut LocalTransform, &mut Velocity, &mut Oscillation)>()
    {
        sway.time += dt;
        let x = sway.origin_x + (sway.time * sway.frequency * TAU).sin() * sway.distance;
        velocity.0 = Vec3::new(x - local.position.x, 0.0, 0.0);
        local.position.x = x;
    }
}

// ---------------------------------------------------------------------------
// Turtle dives
// ---------------------------------------------------------------------------

/// Drive every turtle's dive cycle: float, shake, sink, wait, rise.
pub fn dive_system(world: &mut World, dt: f32, rng: &mut impl Rng) {
    for (entity, (local, dive)) in world.query_mut::<(&mut LocalTransform, &mut DiveCycle)>() {
        dive.fsm.tick(dt);
        let t = dive.fsm.elapsed;

        let next = match dive.fsm.state {
            DivePhase::Floating { next_dive_in } => (t >= next_dive_in).then_some(DivePhase::Shaking),
            DivePhase::Shaking => {
                let p = t / SHAKE_SECS;
                if p <= 1.0 {
                    let frequency = 10.0 + p * 20.0;
                    let wobble = (p * frequency).sin() * FRAC_PI_8 * (1.0 - p);
                    local.rotation = Quat::from_rotation_y(wobble);
                    None
                } else {
                    local.rotation = Quat::IDENTITY;
                    Some(DivePhase::Submerging)
                }
            }
            DivePhase::Submerging => {
                let p = (t / SUBMERGE_SECS).min(1.0);
                local.position.y = dive.surface_y - DIVE_DEPTH * p;
                (t > SUBMERGE_SECS).then_some(DivePhase::Submerged)
            }
            DivePhase::Submerged => (t >= SUBMERGED_SECS).then_some(DivePhase::Emerging),
            DivePhase::Emerging => {
                let p = (t / SUBMERGE_SECS).min(1.0);
                local.position.y = dive.surface_y - DIVE_DEPTH + DIVE_DEPTH * p;
                (t > SUBMERGE_SECS).then(|| DivePhase::Floating {
                    next_dive_in: next_dive_delay(rng),
                })
            }
        };

        if let Some(phase) = next {
            if matches!(phase, DivePhase::Floating { .. }) {
                local.position.y = dive.surface_y;
            }
            debug!(?entity, from = ?dive.fsm.state, to = ?phase, "dive phase");
            dive.fsm.go(phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 1.0 / 60.0;

    fn lane_object(world: &mut World, x: f32, direction: f32, speed: f32) -> hecs::Entity {
        world.spawn((
            LocalTransform::new(Vec3::new(x, -0.5, 20.0)),
            Velocity::default(),
            LaneMotion {
                direction,
                speed,
                lane_z: 20.0,
            },
        ))
    }

    #[test]
    fn test_linear_motion_sets_velocity() {
        let mut world = World::new();
        let car = lane_object(&mut world, 0.0, -1.0, 0.2);
        lane_movement_system(&mut world, DT, -25.0, 25.0);

        assert_relative_eq!(world.get::<&LocalTransform>(car).unwrap().position.x, -0.2);
        assert_eq!(world.get::<&Velocity>(car).unwrap().0, Vec3::new(-0.2, 0.0, 0.0));
    }

    #[test]
    fn test_recycle_to_opposite_bound() {
        let mut world = World::new();
        let right = lane_object(&mut world, 24.99, 1.0, 0.02);
        let left = lane_object(&mut world, -24.9, -1.0, 0.2);
        world.get::<&mut LocalTransform>(left).unwrap().position.z = 21.0;

        lane_movement_system(&mut world, DT, -25.0, 25.0);

        assert_eq!(world.get::<&LocalTransform>(right).unwrap().position.x, -25.0);
        let left_pos = world.get::<&LocalTransform>(left).unwrap().position;
        assert_eq!(left_pos.x, 25.0);
        assert_eq!(left_pos.z, 20.0);
    }

    #[test]
    fn test_oscillation_velocity_is_displacement() {
        let mut world = World::new();
        let turtle = world.spawn((
            LocalTransform::new(Vec3::new(4.0, -0.5, 0.0)),
            Velocity::default(),
            Oscillation {
                origin_x: 4.0,
                distance: 3.0,
                frequency: 0.25,
                time: 0.0,
            },
        ));

        let mut last_x = 4.0;
        for _ in 0..30 {
            lane_movement_system(&mut world, DT, -25.0, 25.0);
            let x = world.get::<&LocalTransform>(turtle).unwrap().position.x;
            let v = world.get::<&Velocity>(turtle).unwrap().0;
            assert_relative_eq!(v.x, x - last_x, epsilon = 1e-6);
            assert!(v.x > 0.0, "first quarter period moves toward +X");
            last_x = x;
        }
        assert!((last_x - 4.0).abs() <= 3.0);
    }

    #[test]
    fn test_dive_cycle_runs_in_order() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let turtle = world.spawn((
            LocalTransform::new(Vec3::new(0.0, -0.5, 0.0)),
            DiveCycle::new(-0.5, 0.5),
        ));

        let mut seen = Vec::new();
        let mut lowest = f32::MAX;
        // 0.5 float + 1 shake + 0.5 sink + 2 under + 0.5 rise, plus slack.
        for _ in 0..(5 * 60) {
            dive_system(&mut world, DT, &mut rng);
            let dive = world.get::<&DiveCycle>(turtle).unwrap();
            let phase = std::mem::discriminant(&dive.fsm.state);
            if seen.last() != Some(&phase) {
                seen.push(phase);
            }
            lowest = lowest.min(world.get::<&LocalTransform>(turtle).unwrap().position.y);
        }

        let expected = [
            DivePhase::Floating { next_dive_in: 0.0 },
            DivePhase::Shaking,
            DivePhase::Submerging,
            DivePhase::Submerged,
            DivePhase::Emerging,
            DivePhase::Floating { next_dive_in: 0.0 },
        ]
        .map(|p| std::mem::discriminant(&p));
        assert_eq!(seen, expected);
        assert_relative_eq!(lowest, -2.0, epsilon = 1e-5);

        let local = world.get::<&LocalTransform>(turtle).unwrap();
        assert_eq!(local.position.y, -0.5);
        assert_eq!(local.rotation, Quat::IDENTITY);

        let dive = world.get::<&DiveCycle>(turtle).unwrap();
        match dive.fsm.state {
            DivePhase::Floating { next_dive_in } => {
                assert!((FLOAT_SECS_MIN..FLOAT_SECS_MAX).contains(&next_dive_in))
            }
            ref other => panic!("expected to float again, got {other:?}"),
        }
    }

    #[test]
    fn test_dive_delay_is_seeded() {
        let a: Vec<f32> = {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            (0..4).map(|_| next_dive_delay(&mut rng)).collect()
        };
        let b: Vec<f32> = {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            (0..4).map(|_| next_dive_delay(&mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
