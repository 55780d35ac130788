//! Two sessions over a loopback link, with simple paddle bots.
//!
//! `RUST_LOG=debug cargo run --bin headless_match` for per-message logs.

use futures::executor::block_on;
use session::{
    EventLog, GameEvent, LoopbackTransport, Phase, Presenter, SceneState, Session, SetupTask,
};
use table_core::{Config, Score};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FRAME_MS: f64 = 1000.0 / 60.0;
const MAX_MATCH_MS: f64 = 10.0 * 60.0 * 1000.0;
/// Bot paddle speed, metres per frame
const BOT_SPEED: f32 = 0.03;

/// Logs the score whenever it changes
struct ScoreLogger {
    name: &'static str,
    last: Option<Score>,
}

impl Presenter for ScoreLogger {
    fn present_frame(&mut self, scene: &SceneState) {
        if self.last != Some(scene.score) {
            info!(
                peer = self.name,
                player = scene.score.player,
                opponent = scene.score.opponent,
                "score"
            );
            self.last = Some(scene.score);
        }
    }
}

fn new_peer(name: &'static str, transport: LoopbackTransport) -> (Session, EventLog) {
    let log = EventLog::new();
    let presenter = ScoreLogger { name, last: None };
    let mut session = Session::new(Config::new(), Box::new(presenter), Box::new(log.clone()));
    session.set_multiplayer(Box::new(transport));
    (session, log)
}

/// Chase the ball sideways at limited speed
fn drive_bot(session: &mut Session) {
    let Some(ball) = session.physics().ball_state() else {
        return;
    };
    let target = session.paddle_target();
    let step = |from: f32, to: f32| from + (to - from).clamp(-BOT_SPEED, BOT_SPEED);
    session.set_paddle_target(step(target.x, ball.pos.x), target.z);
}

fn log_events(name: &str, log: &EventLog) {
    for event in log.drain() {
        match event {
            GameEvent::BallPaddleCollision { .. } | GameEvent::BallTableCollision { .. } => {}
            other => info!(peer = name, event = ?other, "event"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let (host_link, guest_link) = LoopbackTransport::pair();
    let (mut host, host_log) = new_peer("host", host_link);
    let (mut guest, guest_log) = new_peer("guest", guest_link);

    block_on(host.setup(vec![SetupTask::ready("fonts"), SetupTask::ready("models")]))?;
    block_on(guest.setup(vec![SetupTask::ready("fonts"), SetupTask::ready("models")]))?;

    host.start_game();
    guest.start_game();

    let mut now = 0.0;
    while now < MAX_MATCH_MS {
        drive_bot(&mut host);
        drive_bot(&mut guest);
        host.tick(now);
        guest.tick(now);
        log_events("host", &host_log);
        log_events("guest", &guest_log);

        if host.phase() == Phase::GameOver && guest.phase() == Phase::GameOver {
            break;
        }
        now += FRAME_MS;
    }

    info!(
        host = ?host.score(),
        guest = ?guest.score(),
        seconds = now / 1000.0,
        "match finished"
    );
    Ok(())
}
