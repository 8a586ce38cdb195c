use glam::Vec3;

use crate::components::{Aabb, Collider, Footprint, LocalTransform};

/// Below this length a direction is treated as undefined and replaced by +Y.
const DEGENERATE_EPS: f32 = 1e-6;

/// A sphere contact whose normal is at least this vertical counts as "on top"
/// when sphere riding is enabled.
const SPHERE_TOP_NORMAL_Y: f32 = 0.7;

/// Tolerances shared by every narrow-phase test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionSettings {
    /// Band around a top surface inside which a contact counts as standing on it.
    pub on_top_tolerance: f32,
    /// Fixed depth reported by box contacts.
    pub box_penetration: f32,
    /// Downward offset of the support probe.
    pub support_probe: f32,
    pub sphere_reports_on_top: bool,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            on_top_tolerance: 0.1,
            box_penetration: 0.1,
            support_probe: 0.1,
            sphere_reports_on_top: false,
        }
    }
}

/// Geometry of a single overlap, before category is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the object toward the player.
    pub normal: Vec3,
    pub penetration_depth: f32,
    pub is_on_top: bool,
}

fn direction_or_up(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > DEGENERATE_EPS {
        v / len
    } else {
        Vec3::Y
    }
}

/// Player (reduced to a horizontal radius) against a sphere.
pub fn sphere_contact(
    center: Vec3,
    radius: f32,
    position: Vec3,
    footprint: &Footprint,
    settings: &CollisionSettings,
) -> Option<Contact> {
    let reach = radius + footprint.horizontal_radius();
    let diff = position - center;
    let dist = diff.length();
    if dist >= reach {
        return None;
    }
    let normal = direction_or_up(diff);
    Some(Contact {
        normal,
        penetration_depth: reach - dist,
        is_on_top: settings.sphere_reports_on_top && normal.y > SPHERE_TOP_NORMAL_Y,
    })
}

/// Player against a finite cylinder, tested in the cylinder's local frame so
/// lying logs work the same as upright posts.
pub fn cylinder_contact(
    transform: &LocalTransform,
    radius: f32,
    height: f32,
    position: Vec3,
    footprint: &Footprint,
    settings: &CollisionSettings,
) -> Option<Contact> {
    let world = transform.matrix();
    let local = world.inverse().transform_point3(position);

    let radial = (local.x * local.x + local.z * local.z).sqrt();
    let vertical = local.y.abs();
    let radial_reach = radius + footprint.width * 0.5;
    let vertical_reach = height * 0.5 + footprint.half_height();

    if radial >= radial_reach || vertical >= vertical_reach {
        return None;
    }

    let is_on_top = (vertical - vertical_reach).abs() < settings.on_top_tolerance;

    let normal = if radial > DEGENERATE_EPS {
        let local_dir = Vec3::new(local.x / radial, 0.0, local.z / radial);
        direction_or_up(world.transform_vector3(local_dir))
    } else {
        Vec3::Y
    };

    Some(Contact {
        normal,
        penetration_depth: radial_reach - radial,
        is_on_top,
    })
}

/// Player box against a world-space AABB. The normal is the coarse
/// center-to-center direction and the depth is a fixed nominal value; the
/// resolver is tuned around both. "On top" is measured against the AABB's
/// top face, so rotated boxes use their world height.
pub fn box_contact(
    bounds: &Aabb,
    position: Vec3,
    footprint: &Footprint,
    settings: &CollisionSettings,
) -> Option<Contact> {
    let player = Aabb::from_center_half_extents(position, footprint.size() * 0.5);
    if !bounds.intersects(&player) {
        return None;
    }
    let center = bounds.center();
    Some(Contact {
        normal: direction_or_up(position - center),
        penetration_depth: settings.box_penetration,
        is_on_top: position.y > bounds.max.y - settings.on_top_tolerance,
    })
}

/// Dispatch on shape. Boxes use `bounds` when supplied, otherwise derive an
/// AABB from the transform on the spot.
pub fn contact(
    collider: &Collider,
    transform: &LocalTransform,
    bounds: Option<&Aabb>,
    position: Vec3,
    footprint: &Footprint,
    settings: &CollisionSettings,
) -> Option<Contact> {
    match *collider {
        Collider::Sphere { radius } => {
            sphere_contact(transform.position, radius, position, footprint, settings)
        }
        Collider::Cylinder { radius, height } => {
            cylinder_contact(transform, radius, height, position, footprint, settings)
        }
        Collider::Box { half_extents } => {
            let derived;
            let aabb = match bounds {
                Some(aabb) => aabb,
                None => {
                    derived = Aabb::from_transform(transform, half_extents);
                    &derived
                }
            };
            box_contact(aabb, position, footprint, settings)
        }
    }
}
