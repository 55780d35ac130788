pub mod clock;
pub mod components;
pub mod config;
pub mod params;
pub mod resources;
pub mod systems;
pub mod table;

pub use clock::*;
pub use components::*;
pub use config::*;
pub use params::*;
pub use resources::*;
pub use table::*;

use glam::Vec3;
use hecs::{Entity, World};
use systems::*;
use tracing::debug;

/// Rigid-body world for one table: ball, local paddle and static colliders.
///
/// Bodies are addressed through the entity handles kept here; nothing is
/// looked up by name.
pub struct PhysicsWorld {
    world: World,
    config: Config,
    layout: TableLayout,
    events: PhysicsEvents,
    ball: Option<Entity>,
    paddle: Entity,
    net: Entity,
    upwards_table: Entity,
}

impl PhysicsWorld {
    pub fn new(config: Config) -> Self {
        let layout = TableLayout::new(&config);
        let multiplayer = config.mode == Mode::Multiplayer;

        let mut world = World::new();
        world.spawn((Collider::new(ColliderKind::Table, layout.table, true),));
        let net = world.spawn((Collider::new(ColliderKind::Net, layout.net, multiplayer),));
        let upwards_table = world.spawn((Collider::new(
            ColliderKind::UpwardsTable,
            layout.upwards_table,
            !multiplayer,
        ),));
        world.spawn((Collider::new(ColliderKind::Floor, layout.floor, true),));
        let paddle = world.spawn((Paddle::new(Vec3::new(
            0.0,
            config.paddle_rest_y(),
            config.paddle_position_z,
        )),));

        Self {
            world,
            config,
            layout,
            events: PhysicsEvents::new(),
            ball: None,
            paddle,
            net,
            upwards_table,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Switch between net (two players) and practice wall (one player)
    pub fn set_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
        let multiplayer = mode == Mode::Multiplayer;
        if let Ok(mut net) = self.world.get::<&mut Collider>(self.net) {
            net.active = multiplayer;
        }
        if let Ok(mut wall) = self.world.get::<&mut Collider>(self.upwards_table) {
            wall.active = !multiplayer;
        }
    }

    /// Advance by exactly `delta` seconds in fixed micro-steps. A
    /// non-finite `delta` advances nothing.
    pub fn step(&mut self, delta: f32) {
        self.events.clear();
        if !delta.is_finite() {
            debug!(delta, "skipping non-finite step");
            return;
        }

        let mut remaining = delta.max(0.0);
        while remaining > 0.0 {
            let dt = remaining.min(Params::FIXED_DT);
            remaining -= dt;

            move_ball(&mut self.world, dt, self.config.gravity);
            check_collisions(&mut self.world, &self.config, &mut self.events);
        }
    }

    /// Look-ahead for paddle and net contacts the discrete step would miss.
    /// Events are appended to the ones from the last `step`.
    pub fn predict_collisions(&mut self) {
        predict_collisions(&mut self.world, &self.config, &mut self.events);
    }

    /// Move the kinematic paddle; rotation follows `-x`
    pub fn set_paddle_position(&mut self, x: f32, y: f32, z: f32) {
        if let Ok(mut paddle) = self.world.get::<&mut Paddle>(self.paddle) {
            paddle.move_to(Vec3::new(x, y, z));
        }
    }

    pub fn paddle(&self) -> Paddle {
        self.world
            .get::<&Paddle>(self.paddle)
            .map(|paddle| *paddle)
            .unwrap_or_else(|_| Paddle::new(Vec3::ZERO))
    }

    /// Spawn the ball at the serve spot.
    ///
    /// Idempotent: with a ball already present the existing handle is
    /// returned and nothing is spawned.
    pub fn add_ball(&mut self) -> Entity {
        if let Some(entity) = self.ball {
            return entity;
        }
        let entity = self.world.spawn((Ball::new(
            self.config.serve_position(),
            self.config.serve_velocity(),
        ),));
        debug!(?entity, "ball added");
        self.ball = Some(entity);
        entity
    }

    /// Put the ball back at the serve spot with serve velocity
    pub fn init_ball_position(&mut self) {
        let serve = Ball::new(self.config.serve_position(), self.config.serve_velocity());
        self.set_ball(serve);
    }

    pub fn remove_ball(&mut self) {
        if let Some(entity) = self.ball.take() {
            let _ = self.world.despawn(entity);
            debug!(?entity, "ball removed");
        }
    }

    pub fn has_ball(&self) -> bool {
        self.ball.is_some()
    }

    pub fn ball_entity(&self) -> Option<Entity> {
        self.ball
    }

    pub fn ball_state(&self) -> Option<Ball> {
        let entity = self.ball?;
        self.world.get::<&Ball>(entity).ok().map(|ball| *ball)
    }

    /// Overwrite ball position and velocity. Returns false without a ball.
    pub fn set_ball_state(&mut self, pos: Vec3, vel: Vec3) -> bool {
        self.set_ball(Ball::new(pos, vel))
    }

    fn set_ball(&mut self, state: Ball) -> bool {
        let Some(entity) = self.ball else {
            return false;
        };
        match self.world.get::<&mut Ball>(entity) {
            Ok(mut ball) => {
                *ball = state;
                true
            }
            Err(_) => false,
        }
    }

    /// Collisions from the last `step` and `predict_collisions`
    pub fn events(&self) -> &PhysicsEvents {
        &self.events
    }

    pub fn take_events(&mut self) -> PhysicsEvents {
        std::mem::take(&mut self.events)
    }
}
