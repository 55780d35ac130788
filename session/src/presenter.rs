//! Boundary to the renderer

use crate::fsm::Phase;
use crate::transport::Role;
use glam::Vec3;
use table_core::{Mode, Palette, Score};

/// Background/table colours by session role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Blue,
    Green,
    Pink,
}

impl ColorScheme {
    /// Host blue, guest green, practice pink
    pub fn for_session(mode: Mode, role: Option<Role>) -> Self {
        match (mode, role) {
            (Mode::Multiplayer, Some(Role::Host)) => ColorScheme::Blue,
            (Mode::Multiplayer, Some(Role::Guest)) => ColorScheme::Green,
            _ => ColorScheme::Pink,
        }
    }

    pub fn background(&self, palette: &Palette) -> u32 {
        match self {
            ColorScheme::Blue => palette.blue_background,
            ColorScheme::Green => palette.green_background,
            ColorScheme::Pink => palette.pink_background,
        }
    }

    pub fn table(&self, palette: &Palette) -> u32 {
        match self {
            ColorScheme::Blue => palette.blue_table,
            ColorScheme::Green => palette.green_table,
            ColorScheme::Pink => palette.pink_table,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleView {
    pub position: Vec3,
    pub rotation_z: f32,
    pub visible: bool,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub phase: Phase,
    /// Ball position, present only while a ball exists
    pub ball: Option<Vec3>,
    pub paddle: PaddleView,
    pub remote_paddle: PaddleView,
    pub paddle_flash: f32,
    pub swinging: bool,
    pub score: Score,
    pub opponent_score_visible: bool,
    /// Countdown value while the countdown text is shown
    pub countdown: Option<u8>,
    pub menu_visible: bool,
    pub message_visible: bool,
    pub color_scheme: ColorScheme,
    pub background_color: u32,
    pub table_color: u32,
}

pub trait Presenter {
    fn present_frame(&mut self, scene: &SceneState);
}

/// Presenter for runs without a renderer
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present_frame(&mut self, _scene: &SceneState) {}
}
