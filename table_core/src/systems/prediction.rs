use super::collision::{bounce_off_paddle, paddle_bounds};
use super::movement::ballistic;
use crate::{
    Aabb, Ball, Collider, ColliderKind, Config, Paddle, PaddleHit, Params, PhysicsEvent,
    PhysicsEvents,
};
use hecs::World;

/// Resolve paddle and net contacts a few fixed steps ahead.
///
/// A fast ball can pass through the thin paddle or net between two micro
/// steps. If free flight reaches either within `PREDICTION_STEPS` steps the
/// ball is moved to the contact point and the response applied now.
pub fn predict_collisions(world: &mut World, config: &Config, events: &mut PhysicsEvents) {
    let ball_data = world.query::<&Ball>().iter().next().map(|(_e, ball)| *ball);
    let ball = match ball_data {
        Some(ball) => ball,
        None => return,
    };
    let horizon = Params::PREDICTION_STEPS as f32 * Params::FIXED_DT;

    let paddle = world.query::<&Paddle>().iter().next().map(|(_e, paddle)| *paddle);
    let net = world
        .query::<&Collider>()
        .iter()
        .map(|(_e, collider)| *collider)
        .find(|collider| collider.kind == ColliderKind::Net && collider.active);

    let mut predicted = None;
    if let Some(paddle) = paddle {
        if let Some(t) = time_to_paddle(&ball, &paddle, config, horizon) {
            let mut contact = ballistic(&ball, t, config.gravity);
            bounce_off_paddle(&mut contact, &paddle, config);
            events.push(PhysicsEvent::Paddle(PaddleHit {
                position: contact.pos,
                velocity: contact.vel,
            }));
            predicted = Some(contact);
        }
    }

    if predicted.is_none() {
        if let Some(net) = net {
            if let Some(t) = time_to_net(&ball, &net.bounds, config, horizon) {
                // Already at the contact point, only the response is left
                let mut contact = ballistic(&ball, t, config.gravity);
                contact.vel.z = -contact.vel.z * config.ball_box_bounciness;
                events.push(PhysicsEvent::Net);
                predicted = Some(contact);
            }
        }
    }

    if let Some(contact) = predicted {
        for (_entity, stored) in world.query_mut::<&mut Ball>() {
            *stored = contact;
        }
    }
}

/// Time until the ball touches the paddle face, if within `horizon`
fn time_to_paddle(ball: &Ball, paddle: &Paddle, config: &Config, horizon: f32) -> Option<f32> {
    if ball.vel.z <= 0.0 {
        return None;
    }
    let radius = config.ball_radius;
    let face_z = paddle_bounds(paddle, config).min.z - radius;
    if ball.pos.z >= face_z {
        return None;
    }

    let t = (face_z - ball.pos.z) / ball.vel.z;
    if t > horizon {
        return None;
    }

    let at = ballistic(ball, t, config.gravity);
    let within_x = (at.pos.x - paddle.pos.x).abs() <= config.paddle_width / 2.0 + radius;
    let within_y = (at.pos.y - paddle.pos.y).abs() <= config.paddle_height / 2.0 + radius;
    (within_x && within_y).then_some(t)
}

/// Time until the ball meets the net below its top edge, if within `horizon`
fn time_to_net(ball: &Ball, net: &Aabb, config: &Config, horizon: f32) -> Option<f32> {
    let radius = config.ball_radius;
    let contact_z = if ball.pos.z > net.max.z + radius && ball.vel.z < 0.0 {
        net.max.z + radius
    } else if ball.pos.z < net.min.z - radius && ball.vel.z > 0.0 {
        net.min.z - radius
    } else {
        return None;
    };

    let t = (contact_z - ball.pos.z) / ball.vel.z;
    if !(0.0..=horizon).contains(&t) {
        return None;
    }

    let at = ballistic(ball, t, config.gravity);
    let below_top = at.pos.y - radius < net.max.y && at.pos.y + radius > net.min.y;
    let within_x = at.pos.x.abs() <= net.max.x + radius;
    (below_top && within_x).then_some(t)
}
