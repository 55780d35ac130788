use glam::Vec3;
use table_core::*;

fn multiplayer() -> Config {
    Config {
        mode: Mode::Multiplayer,
        ..Config::default()
    }
}

#[test]
fn test_add_ball_is_idempotent() {
    let mut physics = PhysicsWorld::new(Config::new());

    let first = physics.add_ball();
    let second = physics.add_ball();

    assert_eq!(first, second);
    assert_eq!(physics.ball_entity(), Some(first));
}

#[test]
fn test_ball_spawns_at_serve_spot() {
    let mut physics = PhysicsWorld::new(Config::new());
    physics.add_ball();

    let ball = physics.ball_state().unwrap();
    assert_eq!(ball.pos, physics.config().serve_position());
    assert_eq!(ball.vel, physics.config().serve_velocity());
}

#[test]
fn test_step_advances_exact_time() {
    let mut physics = PhysicsWorld::new(Config::new());
    physics.add_ball();
    let start = physics.ball_state().unwrap();

    // Not a multiple of the fixed step
    physics.step(0.013);

    let ball = physics.ball_state().unwrap();
    let expected_z = start.pos.z + start.vel.z * 0.013;
    assert!((ball.pos.z - expected_z).abs() < 1e-5);
    assert!((ball.vel.y - (start.vel.y - Params::GRAVITY * 0.013)).abs() < 1e-4);
}

#[test]
fn test_non_finite_step_leaves_ball_alone() {
    let mut physics = PhysicsWorld::new(Config::new());
    physics.add_ball();
    let start = physics.ball_state().unwrap();

    physics.step(f32::INFINITY);
    physics.step(f32::NAN);

    let ball = physics.ball_state().unwrap();
    assert_eq!(ball.pos, start.pos);
    assert_eq!(ball.vel, start.vel);
    assert!(physics.events().is_empty());
}

#[test]
fn test_step_follows_ballistic_flight() {
    let mut physics = PhysicsWorld::new(Config::new());
    physics.add_ball();
    let start = physics.ball_state().unwrap();

    physics.step(0.1);

    let ball = physics.ball_state().unwrap();
    let expected = systems::ballistic(&start, 0.1, Params::GRAVITY);
    assert!((ball.pos - expected.pos).length() < 0.01);
    assert!(physics.events().is_empty());
}

#[test]
fn test_init_ball_position_resets_state() {
    let mut physics = PhysicsWorld::new(Config::new());
    physics.add_ball();
    physics.step(0.3);

    physics.init_ball_position();

    let ball = physics.ball_state().unwrap();
    assert_eq!(ball.pos, physics.config().serve_position());
    assert_eq!(ball.vel, physics.config().serve_velocity());
}

#[test]
fn test_operations_without_ball_are_noops() {
    let mut physics = PhysicsWorld::new(Config::new());

    physics.init_ball_position();
    physics.remove_ball();
    physics.step(0.1);
    physics.predict_collisions();

    assert!(!physics.has_ball());
    assert!(physics.ball_state().is_none());
    assert!(!physics.set_ball_state(Vec3::ZERO, Vec3::ZERO));
}

#[test]
fn test_remove_ball_then_add_spawns_new_ball() {
    let mut physics = PhysicsWorld::new(Config::new());
    physics.add_ball();
    physics.remove_ball();
    assert!(!physics.has_ball());

    physics.add_ball();
    assert!(physics.has_ball());
}

#[test]
fn test_paddle_rotation_follows_x() {
    let mut physics = PhysicsWorld::new(Config::new());

    physics.set_paddle_position(0.4, 1.0, -0.05);

    let paddle = physics.paddle();
    assert_eq!(paddle.pos, Vec3::new(0.4, 1.0, -0.05));
    assert_eq!(paddle.rotation_z, -0.4);
}

#[test]
fn test_paddle_returns_ball_during_step() {
    let config = multiplayer();
    let paddle_z = config.paddle_position_z;
    let paddle_y = config.paddle_rest_y();
    let mut physics = PhysicsWorld::new(config);
    physics.add_ball();
    physics.set_ball_state(
        Vec3::new(0.0, paddle_y, paddle_z - 0.2),
        Vec3::new(0.0, 0.0, 3.0),
    );

    physics.step(0.1);

    let events = physics.events();
    let hits: Vec<_> = events.paddle_hits().copied().collect();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].velocity.z < 0.0);
    assert!(physics.ball_state().unwrap().vel.z < 0.0);
}

#[test]
fn test_step_clears_previous_events() {
    let config = multiplayer();
    let paddle_z = config.paddle_position_z;
    let paddle_y = config.paddle_rest_y();
    let mut physics = PhysicsWorld::new(config);
    physics.add_ball();
    physics.set_ball_state(
        Vec3::new(0.0, paddle_y, paddle_z - 0.2),
        Vec3::new(0.0, 0.0, 3.0),
    );
    physics.step(0.1);
    assert!(!physics.events().is_empty());

    let taken = physics.take_events();
    assert_eq!(taken.paddle_hits().count(), 1);
    assert!(physics.events().is_empty());

    physics.step(0.01);
    assert_eq!(physics.events().paddle_hits().count(), 0);
}

#[test]
fn test_singleplayer_wall_sends_ball_back() {
    let mut physics = PhysicsWorld::new(Config::new());
    physics.add_ball();

    let mut table_hits = Vec::new();
    let mut came_back = false;
    for _ in 0..120 {
        physics.step(1.0 / 60.0);
        table_hits.extend(physics.events().table_hits().copied());
        if physics.ball_state().unwrap().vel.z > 0.0 {
            came_back = true;
            break;
        }
    }

    assert!(came_back, "Ball should bounce off the upwards table");
    assert!(!table_hits.is_empty());
}

#[test]
fn test_set_mode_swaps_net_and_wall() {
    let mut physics = PhysicsWorld::new(Config::new());
    physics.set_mode(Mode::Multiplayer);
    assert_eq!(physics.config().mode, Mode::Multiplayer);

    // Ball heading for the net just above the table top
    let table_z = physics.config().table_position_z;
    let top = physics.config().table_height;
    physics.add_ball();
    physics.set_ball_state(
        Vec3::new(0.0, top + 0.08, table_z + 0.1),
        Vec3::new(0.0, 0.0, -3.0),
    );
    physics.step(0.05);
    assert_eq!(physics.events().net_hits(), 1);
    assert!(physics.ball_state().unwrap().vel.z > 0.0);

    physics.set_mode(Mode::Singleplayer);
    physics.set_ball_state(
        Vec3::new(0.0, top + 0.08, table_z + 0.1),
        Vec3::new(0.0, 0.0, -3.0),
    );
    physics.step(0.05);
    assert_eq!(physics.events().net_hits(), 0);
}
