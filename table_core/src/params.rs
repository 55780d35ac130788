/// Game tuning parameters for table tennis
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Table (metres)
    pub const TABLE_WIDTH: f32 = 1.525;
    pub const TABLE_DEPTH: f32 = 2.74;
    pub const TABLE_HEIGHT: f32 = 0.76;
    pub const TABLE_POSITION_Z: f32 = -1.5;
    pub const NET_HEIGHT: f32 = 0.1525;
    pub const NET_THICKNESS: f32 = 0.02;

    // Paddle
    pub const PADDLE_POSITION_Z: f32 = -0.05;
    pub const PADDLE_WIDTH: f32 = 0.3;
    pub const PADDLE_HEIGHT: f32 = 0.3;
    pub const PADDLE_DEPTH: f32 = 0.04;
    pub const PADDLE_ABOVE_TABLE: f32 = 0.3;
    pub const PADDLE_LIFT: f32 = 2.5; // min upward speed after a hit
    pub const PADDLE_DEFLECTION: f32 = 0.5; // lateral speed per unit hit offset

    // Camera
    pub const CAMERA_HEIGHT: f32 = 1.6;

    // Ball
    pub const BALL_RADIUS: f32 = 0.03;
    pub const BALL_PADDLE_BOUNCINESS: f32 = 1.0;
    pub const BALL_BOX_BOUNCINESS: f32 = 1.0;
    pub const BALL_INIT_VELOCITY: f32 = 1.0;
    pub const SERVE_HEIGHT: f32 = 0.3;
    pub const SERVE_VELOCITY: [f32; 3] = [0.0, 1.5, -3.0];
    pub const FLOOR_DAMPING: f32 = 0.5;

    // Score
    pub const POINTS_FOR_WIN: u8 = 11;

    // Physics
    pub const GRAVITY: f32 = 9.81;
    pub const FIXED_DT: f32 = 1.0 / 120.0;
    pub const PREDICTION_STEPS: u32 = 3;

    // Scheduling
    pub const MAX_FRAME_MS: f64 = 500.0;
}
