//! Presentation-side state with interpolation

use glam::Vec3;

/// Remote paddle tween time
pub const REMOTE_PADDLE_SMOOTHING_S: f32 = 0.14;
/// Paddle highlight fade after a hit
pub const PADDLE_FLASH_DECAY_S: f32 = 0.5;

/// Opponent paddle, eased towards the last `move` target
#[derive(Debug, Clone)]
pub struct RemotePaddle {
    // Pose when the current tween started
    previous: Vec3,
    // Latest target from the network
    target: Vec3,
    // Interpolation time (0.0 = previous, 1.0 = target)
    alpha: f32,
    time_since_update: f32,
    pub visible: bool,
}

impl RemotePaddle {
    pub fn new(pos: Vec3) -> Self {
        Self {
            previous: pos,
            target: pos,
            alpha: 1.0,
            time_since_update: 0.0,
            visible: false,
        }
    }

    /// Start a new tween from the current pose; z stays put
    pub fn set_target(&mut self, x: f32, y: f32) {
        self.previous = self.position();
        self.target = Vec3::new(x, y, self.target.z);
        self.time_since_update = 0.0;
        self.alpha = 0.0;
    }

    pub fn update_interpolation(&mut self, dt: f32) {
        self.time_since_update += dt;
        self.alpha = (self.time_since_update / REMOTE_PADDLE_SMOOTHING_S).min(1.0);
    }

    pub fn position(&self) -> Vec3 {
        self.previous.lerp(self.target, self.alpha)
    }

    /// Rotation about the vertical axis follows `-x`
    pub fn rotation_z(&self) -> f32 {
        -self.position().x
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }
}

/// Highlight on the local paddle after a hit
#[derive(Debug, Clone, Copy, Default)]
pub struct PaddleFlash {
    opacity: f32,
}

impl PaddleFlash {
    pub fn trigger(&mut self) {
        self.opacity = 1.0;
    }

    /// Linear fade to zero over `PADDLE_FLASH_DECAY_S`
    pub fn update(&mut self, dt: f32) {
        self.opacity = (self.opacity - dt / PADDLE_FLASH_DECAY_S).max(0.0);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}
