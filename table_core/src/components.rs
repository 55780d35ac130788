use crate::table::Aabb;
use glam::Vec3;

/// Ball component - the ping pong ball
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
}

impl Ball {
    pub fn new(pos: Vec3, vel: Vec3) -> Self {
        Self { pos, vel }
    }
}

/// Paddle component - the local player's kinematic paddle
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub pos: Vec3,
    /// Rotation about the vertical axis; always `-pos.x`
    pub rotation_z: f32,
}

impl Paddle {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            rotation_z: -pos.x,
        }
    }

    pub fn move_to(&mut self, pos: Vec3) {
        self.pos = pos;
        self.rotation_z = -pos.x;
    }
}

/// What a static collider represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderKind {
    Table,
    Net,
    /// Far half of the table folded up, used as a practice wall
    UpwardsTable,
    Floor,
}

/// Static box collider
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub kind: ColliderKind,
    pub bounds: Aabb,
    /// Disabled colliders stay in the world but produce no response
    pub active: bool,
}

impl Collider {
    pub fn new(kind: ColliderKind, bounds: Aabb, active: bool) -> Self {
        Self {
            kind,
            bounds,
            active,
        }
    }
}
