use crate::fsm::StateMachine;

/// Straight-line lane traffic that wraps to the far bound when it leaves
/// the lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneMotion {
    /// +1.0 travels toward +X, -1.0 toward -X.
    pub direction: f32,
    /// Units per tick.
    pub speed: f32,
    /// Z the object is put back on when recycled.
    pub lane_z: f32,
}

/// Side-to-side sway around a fixed X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub origin_x: f32,
    /// Peak offset from `origin_x`.
    pub distance: f32,
    /// Cycles per second.
    pub frequency: f32,
    /// Accumulated seconds.
    pub time: f32,
}

/// Phases of a turtle's periodic dive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DivePhase {
    /// At rest on the surface. Counts down to the next dive.
    Floating { next_dive_in: f32 },
    Shaking,
    Submerging,
    Submerged,
    Emerging,
}

/// Attached to turtles: drives the dive and remembers the surface height.
#[derive(Debug, Clone)]
pub struct DiveCycle {
    pub fsm: StateMachine<DivePhase>,
    pub surface_y: f32,
}

impl DiveCycle {
    pub fn new(surface_y: f32, first_dive_in: f32) -> Self {
        Self {
            fsm: StateMachine::new(DivePhase::Floating {
                next_dive_in: first_dive_in,
            }),
            surface_y,
        }
    }
}
