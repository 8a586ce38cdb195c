use hecs::World;
use rand::Rng;
use tracing::info;

use crate::config::LevelConfig;
use crate::error::ShapeError;
use crate::systems::next_dive_delay;

use super::prefabs::{spawn_car, spawn_collectible, spawn_log, spawn_turtle_group, spawn_water_lane};

// Lane table, back (+Z, near the start) to front.
const WATER_LANES: [f32; 6] = [35.0, 30.0, 5.0, 0.0, -25.0, -30.0];
const LOG_LANES: [(f32, f32); 3] = [(35.0, 1.0), (5.0, -1.0), (-25.0, 1.0)];
const TURTLE_LANES: [(f32, f32); 3] = [(30.0, 1.0), (0.0, -1.0), (-30.0, 1.0)];
const CAR_LANES: [(f32, f32); 4] = [(20.0, -1.0), (15.0, 1.0), (-10.0, -1.0), (-15.0, 1.0)];

const LOGS_PER_LANE: usize = 2;
const TURTLE_GROUPS_PER_LANE: usize = 2;
const CARS_PER_LANE: usize = 1;

/// What [`load_level`] put in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelSummary {
    pub water_lanes: usize,
    pub logs: usize,
    pub turtles: usize,
    pub cars: usize,
    pub collectibles: usize,
}

/// `count` centers evenly spread over `[min, max]`, half a slot in from each end.
fn spaced_positions(count: usize, min: f32, max: f32) -> impl Iterator<Item = f32> {
    let spacing = (max - min) / count as f32;
    (0..count).map(move |i| min + spacing * i as f32 + spacing / 2.0)
}

/// Populate `world` with the river-and-road course.
pub fn load_level(world: &mut World, level: &LevelConfig, rng: &mut impl Rng) -> Result<LevelSummary, ShapeError> {
    let mut summary = LevelSummary::default();

    for z in WATER_LANES {
        spawn_water_lane(world, z)?;
        summary.water_lanes += 1;
    }

    for (z, direction) in LOG_LANES {
        for x in spaced_positions(LOGS_PER_LANE, level.min_x, level.max_x) {
            spawn_log(world, x, z, direction)?;
            summary.logs += 1;
        }
    }

    // Turtle groups sway in place, so the lane direction only matters for
    // layout parity with the log lanes.
    for (z, _direction) in TURTLE_LANES {
        for x in spaced_positions(TURTLE_GROUPS_PER_LANE, level.min_x, level.max_x) {
            let dives = [next_dive_delay(rng), next_dive_delay(rng), next_dive_delay(rng)];
            summary.turtles += spawn_turtle_group(world, x, z, dives)?.len();
        }
    }

    for (z, direction) in CAR_LANES {
        for x in spaced_positions(CARS_PER_LANE, level.min_x, level.max_x) {
            spawn_car(world, x, z, direction)?;
            summary.cars += 1;
        }
    }

    for &pos in &level.collectibles {
        spawn_collectible(world, pos)?;
        summary.collectibles += 1;
    }

    info!(?summary, "level loaded");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Category, LaneMotion};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spaced_positions() {
        let xs: Vec<f32> = spaced_positions(2, -25.0, 25.0).collect();
        assert_eq!(xs, vec![-12.5, 12.5]);
        let xs: Vec<f32> = spaced_positions(1, -25.0, 25.0).collect();
        assert_eq!(xs, vec![0.0]);
    }

    #[test]
    fn test_default_layout() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let summary = load_level(&mut world, &LevelConfig::default(), &mut rng).unwrap();

        assert_eq!(
            summary,
            LevelSummary {
                water_lanes: 6,
                logs: 6,
                turtles: 18,
                cars: 4,
                collectibles: 3,
            }
        );
        assert_eq!(world.len() as usize, 6 + 6 + 18 + 4 + 3);

        let hazards = world
            .query::<&Category>()
            .iter()
            .filter(|(_, c)| **c == Category::Hazard)
            .count();
        assert_eq!(hazards, 4);
        assert_eq!(world.query::<&LaneMotion>().iter().count(), 10);
    }
}
