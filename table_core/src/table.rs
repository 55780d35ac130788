use crate::config::Config;
use crate::params::Params;
use glam::Vec3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_size(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Check if sphere intersects AABB
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        (center - self.closest_point(center)).length_squared() <= radius * radius
    }
}

/// Static collider boxes derived from the table geometry
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub table: Aabb,
    pub net: Aabb,
    pub upwards_table: Aabb,
    pub floor: Aabb,
}

impl TableLayout {
    pub fn new(config: &Config) -> Self {
        let top = config.table_height;
        let table = Aabb::new(
            Vec3::new(-config.table_width / 2.0, 0.0, config.far_edge_z()),
            Vec3::new(config.table_width / 2.0, top, config.near_edge_z()),
        );
        let net = Aabb::from_center_size(
            Vec3::new(0.0, top + config.net_height / 2.0, config.table_position_z),
            Vec3::new(config.table_width, config.net_height, Params::NET_THICKNESS),
        );
        // Far half folded up to stand vertically at the far edge
        let upwards_table = Aabb::new(
            Vec3::new(
                -config.table_width / 2.0,
                top,
                config.far_edge_z() - Params::NET_THICKNESS,
            ),
            Vec3::new(
                config.table_width / 2.0,
                top + config.half_depth(),
                config.far_edge_z(),
            ),
        );
        let floor = Aabb::new(
            Vec3::new(-50.0, -1.0, -50.0),
            Vec3::new(50.0, 0.0, 50.0),
        );

        Self {
            table,
            net,
            upwards_table,
            floor,
        }
    }
}
