use crate::params::Params;
use glam::Vec3;
use serde::Deserialize;

/// Single- or two-player match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Singleplayer,
    Multiplayer,
}

/// Colour palette, `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    pub blue_background: u32,
    pub blue_table: u32,
    pub green_background: u32,
    pub green_table: u32,
    pub pink_background: u32,
    pub pink_table: u32,
    pub paddle: u32,
    pub paddle_wood: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            blue_background: 0x0a1f3d,
            blue_table: 0x2f6fd6,
            green_background: 0x0b2e1c,
            green_table: 0x2e9b57,
            pink_background: 0x3d0a2a,
            pink_table: 0xe0559b,
            paddle: 0xd0312d,
            paddle_wood: 0xc8a165,
        }
    }
}

/// Game configuration.
///
/// Both peers of a match must run with the same geometry: every vector that
/// crosses the wire is mirrored around `table_position_z`, so an asymmetric
/// table makes the ball jump on arrival.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    pub mode: Mode,
    pub table_width: f32,
    pub table_depth: f32,
    pub table_height: f32,
    pub table_position_z: f32,
    pub net_height: f32,
    pub paddle_position_z: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_depth: f32,
    pub camera_height: f32,
    pub points_for_win: u8,
    pub colors: Palette,
    pub gravity: f32,
    pub ball_radius: f32,
    pub ball_paddle_bounciness: f32,
    pub ball_box_bounciness: f32,
    pub ball_init_velocity: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Singleplayer,
            table_width: Params::TABLE_WIDTH,
            table_depth: Params::TABLE_DEPTH,
            table_height: Params::TABLE_HEIGHT,
            table_position_z: Params::TABLE_POSITION_Z,
            net_height: Params::NET_HEIGHT,
            paddle_position_z: Params::PADDLE_POSITION_Z,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_depth: Params::PADDLE_DEPTH,
            camera_height: Params::CAMERA_HEIGHT,
            points_for_win: Params::POINTS_FOR_WIN,
            colors: Palette::default(),
            gravity: Params::GRAVITY,
            ball_radius: Params::BALL_RADIUS,
            ball_paddle_bounciness: Params::BALL_PADDLE_BOUNCINESS,
            ball_box_bounciness: Params::BALL_BOX_BOUNCINESS,
            ball_init_velocity: Params::BALL_INIT_VELOCITY,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a camelCase JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tableWidth", self.table_width),
            ("tableDepth", self.table_depth),
            ("tableHeight", self.table_height),
            ("netHeight", self.net_height),
            ("paddleWidth", self.paddle_width),
            ("paddleHeight", self.paddle_height),
            ("paddleDepth", self.paddle_depth),
            ("ballRadius", self.ball_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive(name));
            }
        }

        let finite = [
            ("tablePositionZ", self.table_position_z),
            ("paddlePositionZ", self.paddle_position_z),
            ("cameraHeight", self.camera_height),
            ("gravity", self.gravity),
            ("ballInitVelocity", self.ball_init_velocity),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
        }

        for (name, value) in [
            ("ballPaddleBounciness", self.ball_paddle_bounciness),
            ("ballBoxBounciness", self.ball_box_bounciness),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Bounciness(name));
            }
        }

        if self.points_for_win == 0 {
            return Err(ConfigError::PointsForWin);
        }

        if self.paddle_position_z <= self.table_position_z {
            return Err(ConfigError::PaddleOnEnemyHalf);
        }

        Ok(())
    }

    pub fn half_depth(&self) -> f32 {
        self.table_depth / 2.0
    }

    /// Near table edge on the local side
    pub fn near_edge_z(&self) -> f32 {
        self.table_position_z + self.half_depth()
    }

    /// Far table edge, where the opponent stands
    pub fn far_edge_z(&self) -> f32 {
        self.table_position_z - self.half_depth()
    }

    /// Resting height of the local paddle
    pub fn paddle_rest_y(&self) -> f32 {
        self.table_height + Params::PADDLE_ABOVE_TABLE
    }

    /// True for the half of the table facing the opponent
    pub fn is_enemy_half(&self, z: f32) -> bool {
        z < self.table_position_z
    }

    /// Serve spot above the local half
    pub fn serve_position(&self) -> Vec3 {
        Vec3::new(
            0.0,
            self.table_height + Params::SERVE_HEIGHT,
            self.table_position_z + self.half_depth() * 0.8,
        )
    }

    pub fn serve_velocity(&self) -> Vec3 {
        Vec3::from_array(Params::SERVE_VELOCITY) * self.ball_init_velocity
    }

    pub fn miss_timeout_ms(&self) -> f64 {
        match self.mode {
            Mode::Singleplayer => 1500.0,
            Mode::Multiplayer => 3000.0,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0} must be finite and > 0")]
    NotPositive(&'static str),

    #[error("{0} must be finite")]
    NotFinite(&'static str),

    #[error("{0} must be within 0..=1")]
    Bounciness(&'static str),

    #[error("pointsForWin must be at least 1")]
    PointsForWin,

    #[error("paddlePositionZ must be on the local half of the table")]
    PaddleOnEnemyHalf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::new().validate().is_ok());
    }

    #[test]
    fn enemy_half_is_behind_table_center() {
        let config = Config {
            table_position_z: 0.0,
            table_depth: 8.0,
            ..Config::default()
        };
        assert!(config.is_enemy_half(-0.1));
        assert!(!config.is_enemy_half(0.1));
        assert_eq!(config.near_edge_z(), 4.0);
        assert_eq!(config.far_edge_z(), -4.0);
    }

    #[test]
    fn serve_starts_on_local_half_heading_away() {
        let config = Config::new();
        assert!(!config.is_enemy_half(config.serve_position().z));
        assert!(config.serve_velocity().z < 0.0);
    }

    #[test]
    fn miss_timeout_depends_on_mode() {
        let mut config = Config::new();
        assert_eq!(config.miss_timeout_ms(), 1500.0);
        config.mode = Mode::Multiplayer;
        assert_eq!(config.miss_timeout_ms(), 3000.0);
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = Config::from_json(r#"{"mode":"multiplayer","pointsForWin":5}"#).unwrap();
        assert_eq!(config.mode, Mode::Multiplayer);
        assert_eq!(config.points_for_win, 5);
        assert_eq!(config.table_depth, Params::TABLE_DEPTH);
    }

    #[test]
    fn from_json_rejects_unknown_fields() {
        let err = Config::from_json(r#"{"tableColour":1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn negative_radius_invalid() {
        let config = Config {
            ball_radius: -0.01,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive("ballRadius"))
        ));
    }

    #[test]
    fn bounciness_above_one_invalid() {
        let config = Config {
            ball_box_bounciness: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn paddle_on_enemy_half_invalid() {
        let config = Config {
            paddle_position_z: Params::TABLE_POSITION_Z - 0.5,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PaddleOnEnemyHalf)));
    }

    #[test]
    fn zero_points_for_win_invalid() {
        let config = Config {
            points_for_win: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PointsForWin)));
    }
}
