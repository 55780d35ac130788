use crate::{
    Aabb, Ball, Collider, ColliderKind, Config, Paddle, PaddleHit, Params, PhysicsEvent,
    PhysicsEvents, TableHit,
};
use glam::Vec3;
use hecs::World;

/// Collision box of the local paddle
pub fn paddle_bounds(paddle: &Paddle, config: &Config) -> Aabb {
    Aabb::from_center_size(
        paddle.pos,
        Vec3::new(config.paddle_width, config.paddle_height, config.paddle_depth),
    )
}

/// Resolve ball collisions against the static colliders and the paddle
pub fn check_collisions(world: &mut World, config: &Config, events: &mut PhysicsEvents) {
    let ball_data = world.query::<&Ball>().iter().next().map(|(_e, ball)| *ball);
    let mut ball = match ball_data {
        Some(ball) => ball,
        None => return,
    };

    let colliders: Vec<Collider> = world
        .query::<&Collider>()
        .iter()
        .map(|(_e, collider)| *collider)
        .filter(|collider| collider.active)
        .collect();

    for collider in &colliders {
        match collider.kind {
            ColliderKind::Table => {
                if let Some(hit) = bounce_off_table(&mut ball, &collider.bounds, config) {
                    events.push(PhysicsEvent::Table(hit));
                }
            }
            ColliderKind::Net => {
                if bounce_off_net(&mut ball, &collider.bounds, config) {
                    events.push(PhysicsEvent::Net);
                }
            }
            ColliderKind::UpwardsTable => {
                if let Some(hit) = bounce_off_wall(&mut ball, &collider.bounds, config) {
                    events.push(PhysicsEvent::Table(hit));
                }
            }
            ColliderKind::Floor => bounce_off_floor(&mut ball, &collider.bounds, config),
        }
    }

    let paddle = world.query::<&Paddle>().iter().next().map(|(_e, paddle)| *paddle);
    if let Some(paddle) = paddle {
        // Only a ball travelling towards the player can be returned
        if ball.vel.z > 0.0
            && paddle_bounds(&paddle, config).intersects_sphere(ball.pos, config.ball_radius)
        {
            bounce_off_paddle(&mut ball, &paddle, config);
            events.push(PhysicsEvent::Paddle(PaddleHit {
                position: ball.pos,
                velocity: ball.vel,
            }));
        }
    }

    for (_entity, stored) in world.query_mut::<&mut Ball>() {
        *stored = ball;
    }
}

/// Send the ball back from the paddle face.
///
/// The normal component keeps `ball_paddle_bounciness` of its speed, the
/// ball gets at least `PADDLE_LIFT` upwards and is deflected sideways by
/// where it met the paddle.
pub fn bounce_off_paddle(ball: &mut Ball, paddle: &Paddle, config: &Config) {
    let half_width = config.paddle_width / 2.0;
    let hit_relative_x = ((ball.pos.x - paddle.pos.x) / half_width).clamp(-1.0, 1.0);
    let speed = ball.vel.length();

    ball.vel.z = -ball.vel.z.abs() * config.ball_paddle_bounciness;
    ball.vel.y = ball.vel.y.abs().max(Params::PADDLE_LIFT);
    ball.vel.x += hit_relative_x * Params::PADDLE_DEFLECTION * speed;

    // Push ball out of paddle
    ball.pos.z = paddle_bounds(paddle, config).min.z - config.ball_radius;
}

/// Bounce on the table top
pub fn bounce_off_table(ball: &mut Ball, bounds: &Aabb, config: &Config) -> Option<TableHit> {
    let radius = config.ball_radius;
    let top = bounds.max.y;
    let from_above = ball.pos.y >= top - radius;
    if ball.vel.y >= 0.0 || !from_above || !bounds.intersects_sphere(ball.pos, radius) {
        return None;
    }

    ball.vel.y = -ball.vel.y * config.ball_box_bounciness;
    ball.pos.y = top + radius;
    Some(TableHit {
        point: Vec3::new(ball.pos.x, top, ball.pos.z),
    })
}

/// Bounce off the net back towards the side the ball came from
pub fn bounce_off_net(ball: &mut Ball, bounds: &Aabb, config: &Config) -> bool {
    let radius = config.ball_radius;
    if !bounds.intersects_sphere(ball.pos, radius) {
        return false;
    }

    let center_z = bounds.center().z;
    if ball.pos.z >= center_z && ball.vel.z < 0.0 {
        ball.pos.z = bounds.max.z + radius;
    } else if ball.pos.z < center_z && ball.vel.z > 0.0 {
        ball.pos.z = bounds.min.z - radius;
    } else {
        return false;
    }
    ball.vel.z = -ball.vel.z * config.ball_box_bounciness;
    true
}

/// Bounce off the folded-up far half of the table
pub fn bounce_off_wall(ball: &mut Ball, bounds: &Aabb, config: &Config) -> Option<TableHit> {
    let radius = config.ball_radius;
    if ball.vel.z >= 0.0
        || ball.pos.z < bounds.min.z
        || !bounds.intersects_sphere(ball.pos, radius)
    {
        return None;
    }

    ball.vel.z = -ball.vel.z * config.ball_box_bounciness;
    ball.pos.z = bounds.max.z + radius;
    Some(TableHit {
        point: Vec3::new(ball.pos.x, ball.pos.y, bounds.max.z),
    })
}

/// Damped bounce on the floor, no event
pub fn bounce_off_floor(ball: &mut Ball, bounds: &Aabb, config: &Config) {
    let radius = config.ball_radius;
    if ball.vel.y < 0.0 && ball.pos.y - radius <= bounds.max.y {
        ball.vel.y = -ball.vel.y * Params::FLOOR_DAMPING;
        ball.pos.y = bounds.max.y + radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mode, TableLayout};

    fn setup_world(mode: Mode) -> (World, Config, PhysicsEvents) {
        let config = Config {
            mode,
            ..Config::default()
        };
        let layout = TableLayout::new(&config);
        let mut world = World::new();
        world.spawn((Collider::new(ColliderKind::Table, layout.table, true),));
        world.spawn((Collider::new(
            ColliderKind::Net,
            layout.net,
            mode == Mode::Multiplayer,
        ),));
        world.spawn((Collider::new(
            ColliderKind::UpwardsTable,
            layout.upwards_table,
            mode == Mode::Singleplayer,
        ),));
        world.spawn((Collider::new(ColliderKind::Floor, layout.floor, true),));
        world.spawn((Paddle::new(Vec3::new(
            0.0,
            config.paddle_rest_y(),
            config.paddle_position_z,
        )),));
        (world, config, PhysicsEvents::new())
    }

    fn ball(world: &World) -> Ball {
        world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, ball)| *ball)
            .unwrap()
    }

    #[test]
    fn test_ball_bounces_on_table_top() {
        let (mut world, config, mut events) = setup_world(Mode::Multiplayer);
        world.spawn((Ball::new(
            Vec3::new(0.0, 0.78, -1.0),
            Vec3::new(0.0, -2.0, -1.0),
        ),));

        check_collisions(&mut world, &config, &mut events);

        let ball = ball(&world);
        assert!((ball.vel.y - 2.0).abs() < 1e-6, "Vertical speed reflected");
        assert_eq!(ball.vel.z, -1.0, "Z velocity should be unchanged");
        assert!(ball.pos.y >= config.table_height + config.ball_radius);
        let hits: Vec<_> = events.table_hits().copied().collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].point.y, config.table_height);
        assert_eq!(hits[0].point.z, -1.0);
    }

    #[test]
    fn test_rising_ball_passes_table_top() {
        let (mut world, config, mut events) = setup_world(Mode::Multiplayer);
        world.spawn((Ball::new(
            Vec3::new(0.0, 0.78, -1.0),
            Vec3::new(0.0, 2.0, -1.0),
        ),));

        check_collisions(&mut world, &config, &mut events);

        assert!(ball(&world).vel.y > 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_ball_bounces_off_net_in_multiplayer() {
        let (mut world, config, mut events) = setup_world(Mode::Multiplayer);
        world.spawn((Ball::new(
            Vec3::new(0.0, 0.85, -1.47),
            Vec3::new(0.0, 0.0, -3.0),
        ),));

        check_collisions(&mut world, &config, &mut events);

        let ball = ball(&world);
        assert!((ball.vel.z - 3.0).abs() < 1e-6, "Ball should come back");
        assert!(ball.pos.z > -1.49, "Ball should be pushed out of the net");
        assert_eq!(events.net_hits(), 1);
        assert_eq!(events.table_hits().count(), 0);
    }

    #[test]
    fn test_net_inactive_in_singleplayer() {
        let (mut world, config, mut events) = setup_world(Mode::Singleplayer);
        world.spawn((Ball::new(
            Vec3::new(0.0, 0.85, -1.47),
            Vec3::new(0.0, 0.0, -3.0),
        ),));

        check_collisions(&mut world, &config, &mut events);

        assert_eq!(ball(&world).vel.z, -3.0);
        assert_eq!(events.net_hits(), 0);
    }

    #[test]
    fn test_ball_bounces_off_upwards_table() {
        let (mut world, config, mut events) = setup_world(Mode::Singleplayer);
        world.spawn((Ball::new(
            Vec3::new(0.0, 1.2, -2.85),
            Vec3::new(0.0, 0.0, -3.0),
        ),));

        check_collisions(&mut world, &config, &mut events);

        let ball = ball(&world);
        assert!(ball.vel.z > 0.0);
        let hits: Vec<_> = events.table_hits().copied().collect();
        assert_eq!(hits.len(), 1);
        assert!(config.is_enemy_half(hits[0].point.z));
    }

    #[test]
    fn test_ball_collides_with_paddle() {
        let (mut world, config, mut events) = setup_world(Mode::Multiplayer);
        let paddle_z = config.paddle_position_z;
        world.spawn((Ball::new(
            Vec3::new(0.075, config.paddle_rest_y(), paddle_z - 0.04),
            Vec3::new(0.0, -1.0, 3.0),
        ),));

        check_collisions(&mut world, &config, &mut events);

        let ball = ball(&world);
        assert!((ball.vel.z + 3.0).abs() < 1e-6, "Ball should head back");
        assert_eq!(ball.vel.y, Params::PADDLE_LIFT);
        assert!(ball.vel.x > 0.0, "Off-centre hit should deflect sideways");
        assert!(
            (ball.pos.z - (paddle_z - config.paddle_depth / 2.0 - config.ball_radius)).abs()
                < 1e-6,
            "Ball should be pushed out of paddle"
        );
        let hits: Vec<_> = events.paddle_hits().copied().collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].position, ball.pos);
        assert_eq!(hits[0].velocity, ball.vel);
    }

    #[test]
    fn test_ball_does_not_bounce_when_moving_away_from_paddle() {
        let (mut world, config, mut events) = setup_world(Mode::Multiplayer);
        world.spawn((Ball::new(
            Vec3::new(0.0, config.paddle_rest_y(), config.paddle_position_z - 0.04),
            Vec3::new(0.0, 0.0, -3.0),
        ),));

        check_collisions(&mut world, &config, &mut events);

        assert_eq!(ball(&world).vel.z, -3.0);
        assert_eq!(events.paddle_hits().count(), 0);
    }

    #[test]
    fn test_floor_bounce_is_damped_and_silent() {
        let (mut world, config, mut events) = setup_world(Mode::Multiplayer);
        world.spawn((Ball::new(
            Vec3::new(0.0, 0.02, 1.0),
            Vec3::new(0.0, -2.0, 0.0),
        ),));

        check_collisions(&mut world, &config, &mut events);

        let ball = ball(&world);
        assert!((ball.vel.y - 2.0 * Params::FLOOR_DAMPING).abs() < 1e-6);
        assert_eq!(ball.pos.y, config.ball_radius);
        assert!(events.is_empty());
    }

    #[test]
    fn test_no_collision_when_no_ball() {
        let (mut world, config, mut events) = setup_world(Mode::Multiplayer);
        check_collisions(&mut world, &config, &mut events);
        assert!(events.is_empty());
    }
}
