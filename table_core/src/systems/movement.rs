use crate::Ball;
use glam::Vec3;
use hecs::World;

/// Apply gravity and move the ball
pub fn move_ball(world: &mut World, dt: f32, gravity: f32) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.vel.y -= gravity * dt;
        ball.pos += ball.vel * dt;
    }
}

/// Ball state after `t` seconds of free flight
pub fn ballistic(ball: &Ball, t: f32, gravity: f32) -> Ball {
    let accel = Vec3::new(0.0, -gravity, 0.0);
    Ball {
        pos: ball.pos + ball.vel * t + accel * (0.5 * t * t),
        vel: ball.vel + accel * t,
    }
}
