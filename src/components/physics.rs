use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::components::LocalTransform;
use crate::error::ShapeError;

/// Collision shape attached to a world object. Fixed at creation.
///
/// Build through [`Collider::sphere`], [`Collider::cylinder`] or
/// [`Collider::cuboid`] so the parameters are checked up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Sphere { radius: f32 },
    /// Finite cylinder along the object's local Y axis.
    Cylinder { radius: f32, height: f32 },
    /// Box given by half-extents in the object's local frame. Collision uses
    /// the world-space [`Aabb`] derived from the transform.
    Box { half_extents: Vec3 },
}

impl Collider {
    pub fn sphere(radius: f32) -> Result<Self, ShapeError> {
        let shape = Self::Sphere { radius };
        shape.validate()?;
        Ok(shape)
    }

    pub fn cylinder(radius: f32, height: f32) -> Result<Self, ShapeError> {
        let shape = Self::Cylinder { radius, height };
        shape.validate()?;
        Ok(shape)
    }

    pub fn cuboid(half_extents: Vec3) -> Result<Self, ShapeError> {
        let shape = Self::Box { half_extents };
        shape.validate()?;
        Ok(shape)
    }

    /// Check that every parameter is finite and strictly positive.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        match *self {
            Self::Sphere { radius } => {
                if !ok(radius) {
                    return Err(ShapeError::Radius(radius));
                }
            }
            Self::Cylinder { radius, height } => {
                if !ok(radius) {
                    return Err(ShapeError::Radius(radius));
                }
                if !ok(height) {
                    return Err(ShapeError::Height(height));
                }
            }
            Self::Box { half_extents } => {
                if !(ok(half_extents.x) && ok(half_extents.y) && ok(half_extents.z)) {
                    return Err(ShapeError::HalfExtents(half_extents.to_array()));
                }
            }
        }
        Ok(())
    }

    /// Distance from the object's center up to the surface a rider stands on.
    pub fn top_offset(&self) -> f32 {
        match *self {
            Self::Sphere { radius } => radius,
            Self::Cylinder { height, .. } => height * 0.5,
            Self::Box { half_extents } => half_extents.y,
        }
    }
}

/// What a world object means to the player. Geometry is independent of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Solid scenery. Can be stood on; never fatal.
    Obstacle,
    /// Rideable surface that carries the player along.
    Platform,
    /// Fatal on any contact.
    Hazard,
    /// Removed on contact.
    Collectible,
    /// Fatal unless the player is riding a platform.
    Water,
}

/// World-space axis-aligned bounding box, kept in sync with the transform of
/// box-shaped objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bounds of a box with local `half_extents` after rotation and scale.
    pub fn from_transform(transform: &LocalTransform, half_extents: Vec3) -> Self {
        let basis = glam::Mat3::from_quat(transform.rotation);
        let scaled = half_extents * transform.scale;
        let world_half = basis.x_axis.abs() * scaled.x
            + basis.y_axis.abs() * scaled.y
            + basis.z_axis.abs() * scaled.z;
        Self::from_center_half_extents(transform.position, world_half)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Closed-interval overlap: touching faces count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }
}

/// Outcome of testing the player against one object for one tick.
/// Recomputed every tick; never stored on the object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub collides: bool,
    pub category: Category,
    /// Unit vector pointing from the object toward the player.
    pub normal: Vec3,
    /// Overlap along `normal`; always >= 0 for a hit.
    pub penetration_depth: f32,
    /// Player is resting on the object's top surface rather than its side.
    pub is_on_top: bool,
}

impl CollisionResult {
    pub fn miss(category: Category) -> Self {
        Self {
            collides: false,
            category,
            normal: Vec3::Y,
            penetration_depth: 0.0,
            is_on_top: false,
        }
    }
}

/// A colliding object paired with its result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub entity: Entity,
    pub result: CollisionResult,
}
