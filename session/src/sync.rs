//! Coordinate mirroring between the two peers.
//!
//! Each peer sees itself on the near side of the table, so every vector
//! that crosses the wire is reflected through the table's centre line.

use glam::Vec3;
use proto::Vec3Wire;

/// Reflect a point into the other peer's frame.
///
/// `x' = -x`, `y' = y`, `z' = z - sign(z - T) * |z - T| * 2` with `T` the
/// table's z position, which reduces to `2T - z`.
pub fn mirror_position(p: Vec3, table_z: f32) -> Vec3 {
    Vec3::new(-p.x, p.y, 2.0 * table_z - p.z)
}

/// Reflect a velocity; gravity's axis is shared
pub fn mirror_velocity(v: Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, -v.z)
}

pub fn to_wire(v: Vec3) -> Vec3Wire {
    Vec3Wire::new(v.x, v.y, v.z)
}

pub fn from_wire(v: Vec3Wire) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}
