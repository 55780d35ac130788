//! Peer-to-peer protocol for a table tennis match
//!
//! Uses postcard for compact binary frames. Vectors are always in the
//! sender's local frame; the receiver mirrors them.

use postcard::{from_bytes, to_allocvec};

/// 3-vector on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3Wire {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3Wire {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

// ============================================================================
// Peer Messages (symmetric, either side may send any of them)
// ============================================================================

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PeerMsg {
    /// Paddle target for the remote paddle, x already mirrored by the sender
    Move { x: f32, y: f32 },

    /// Ball left the sender's paddle
    /// add_ball: bootstrap flag, the receiver spawns its ball first
    Hit {
        point: Vec3Wire,
        velocity: Vec3Wire,
        add_ball: bool,
    },

    /// Miss-timeout fired on the sender
    Miss {
        point: Vec3Wire,
        velocity: Vec3Wire,
        ball_has_hit_enemy_table: bool,
    },

    /// Sender wants a rematch
    RestartGame,

    /// Sender is ready for the countdown
    RequestCountdown,
}

impl PeerMsg {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            PeerMsg::Move { .. } => "move",
            PeerMsg::Hit { .. } => "hit",
            PeerMsg::Miss { .. } => "miss",
            PeerMsg::RestartGame => "restartGame",
            PeerMsg::RequestCountdown => "requestCountdown",
        }
    }

    /// Serialize message to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize message from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}
