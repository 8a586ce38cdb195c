mod lane;
mod physics;
mod player;

pub use lane::{DiveCycle, DivePhase, LaneMotion, Oscillation};
pub use physics::{Aabb, Category, Collider, CollisionResult, Hit};
pub use player::{Footprint, Lifecycle, MotionFlags, Player, PlayerFsm};

use glam::{Mat4, Quat, Vec3};

/// World-space placement of an object: position, orientation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Linear velocity in world space, in units per tick.
///
/// Lane objects write this every tick so riders can inherit it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec3);
