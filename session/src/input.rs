//! Pointer input for the local paddle

use glam::Vec3;
use table_core::Config;

/// Metres per pointer count
pub const POINTER_SENSITIVITY: f32 = 0.001;

/// New paddle target for a relative pointer move.
///
/// `dx` moves the paddle sideways within `±table_width`, `dy` moves it along
/// the table. The paddle stays at its resting height.
pub fn apply_pointer_delta(paddle: Vec3, dx: f32, dy: f32, config: &Config) -> Vec3 {
    let x = (paddle.x + POINTER_SENSITIVITY * dx).clamp(-config.table_width, config.table_width);
    let z = paddle.z + POINTER_SENSITIVITY * dy;
    Vec3::new(x, config.paddle_rest_y(), z)
}

/// Paddle target once pointer lock is lost
pub fn released_position(config: &Config) -> Vec3 {
    Vec3::new(0.0, config.paddle_rest_y(), config.paddle_position_z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_moves_paddle() {
        let config = Config::new();
        let start = Vec3::new(0.0, config.paddle_rest_y(), config.paddle_position_z);

        let moved = apply_pointer_delta(start, 100.0, -50.0, &config);

        assert!((moved.x - 0.1).abs() < 1e-6);
        assert!((moved.z - (config.paddle_position_z - 0.05)).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_keeps_resting_height() {
        let config = Config::new();
        let raised = Vec3::new(0.0, 1.4, config.paddle_position_z);

        let moved = apply_pointer_delta(raised, 0.0, 30.0, &config);

        assert_eq!(moved.y, config.paddle_rest_y(), "Height is not driven by input");
    }

    #[test]
    fn test_pointer_x_is_clamped_to_table_width() {
        let config = Config::new();
        let moved = apply_pointer_delta(Vec3::ZERO, 1.0e6, 0.0, &config);
        assert_eq!(moved.x, config.table_width);

        let moved = apply_pointer_delta(Vec3::ZERO, -1.0e6, 0.0, &config);
        assert_eq!(moved.x, -config.table_width);
    }

    #[test]
    fn test_released_paddle_returns_to_centre() {
        let config = Config::new();
        let released = released_position(&config);
        assert_eq!(released.x, 0.0);
        assert_eq!(released.y, config.paddle_rest_y());
        assert_eq!(released.z, config.paddle_position_z);
    }
}
