//! One peer's match: clock, physics, phase machine and the peer link.

use crate::error::{SetupError, TransportError};
use crate::events::{EventSink, GameEvent};
use crate::fsm::{Phase, PhaseAction, PhaseMachine};
use crate::input::{apply_pointer_delta, released_position};
use crate::presenter::{ColorScheme, PaddleView, Presenter, SceneState};
use crate::setup::{run_all, SetupTask};
use crate::state::{PaddleFlash, RemotePaddle};
use crate::sync::{from_wire, mirror_position, mirror_velocity};
use crate::transport::{Role, Transport};
use glam::Vec3;
use proto::{PeerMsg, Vec3Wire};
use table_core::{
    Config, FrameClock, Mode, PaddleHit, PhysicsEvent, PhysicsEvents, PhysicsWorld, Score, Side,
    TimerId, Timers,
};
use tracing::{debug, info, warn};

pub const COUNTDOWN_INTERVAL_MS: f64 = 1000.0;
pub const COUNTDOWN_START: u8 = 2;
/// Lets the solver finish separating ball and paddle; the ball state is read
/// when the delay runs out
pub const HIT_SEND_DELAY_MS: f64 = 10.0;
pub const HIT_COOLDOWN_MS: f64 = 300.0;
/// Ball-to-paddle distance that starts the swing animation
pub const HIT_ANIMATION_DISTANCE: f32 = 0.3;

/// What a due timer was armed for
#[derive(Debug, Clone, Copy)]
enum Fired {
    Countdown,
    Miss,
    HitCooldown,
    SendHit,
}

/// Timer handles by purpose. Arming always cancels the previous handle.
#[derive(Debug, Default)]
struct SessionTimers {
    countdown: Option<TimerId>,
    miss: Option<TimerId>,
    hit_cooldown: Option<TimerId>,
    pending_hits: Vec<TimerId>,
}

impl SessionTimers {
    fn arm_countdown(&mut self, timers: &mut Timers) {
        self.cancel_countdown(timers);
        self.countdown = Some(timers.set_interval(COUNTDOWN_INTERVAL_MS));
    }

    fn cancel_countdown(&mut self, timers: &mut Timers) {
        if let Some(id) = self.countdown.take() {
            timers.clear(id);
        }
    }

    fn arm_miss(&mut self, timers: &mut Timers, timeout_ms: f64) {
        self.cancel_miss(timers);
        self.miss = Some(timers.set_timeout(timeout_ms));
    }

    fn cancel_miss(&mut self, timers: &mut Timers) {
        if let Some(id) = self.miss.take() {
            timers.clear(id);
        }
    }

    fn arm_hit_cooldown(&mut self, timers: &mut Timers) {
        if let Some(id) = self.hit_cooldown.take() {
            timers.clear(id);
        }
        self.hit_cooldown = Some(timers.set_timeout(HIT_COOLDOWN_MS));
    }

    fn queue_hit(&mut self, timers: &mut Timers) {
        self.pending_hits.push(timers.set_timeout(HIT_SEND_DELAY_MS));
    }

    fn cancel_pending_hits(&mut self, timers: &mut Timers) {
        for id in self.pending_hits.drain(..) {
            timers.clear(id);
        }
    }

    /// Everything except the swing cooldown, which is purely cosmetic
    fn cancel_match(&mut self, timers: &mut Timers) {
        self.cancel_countdown(timers);
        self.cancel_miss(timers);
        self.cancel_pending_hits(timers);
    }

    /// Map a due timer to its purpose, forgetting one-shot handles
    fn classify(&mut self, id: TimerId) -> Option<Fired> {
        if self.countdown == Some(id) {
            return Some(Fired::Countdown);
        }
        if self.miss == Some(id) {
            self.miss = None;
            return Some(Fired::Miss);
        }
        if self.hit_cooldown == Some(id) {
            self.hit_cooldown = None;
            return Some(Fired::HitCooldown);
        }
        let index = self.pending_hits.iter().position(|pending| *pending == id)?;
        self.pending_hits.remove(index);
        Some(Fired::SendHit)
    }
}

/// A peer's view of the match.
///
/// Driven by `tick` once per display refresh. Everything that happens in the
/// match, local physics, timers and inbound messages, is handled from inside
/// `tick`, in a fixed order.
pub struct Session {
    physics: PhysicsWorld,
    fsm: PhaseMachine,
    clock: FrameClock,
    timers: Timers,
    session_timers: SessionTimers,
    score: Score,
    transport: Option<Box<dyn Transport>>,
    role: Option<Role>,
    presenter: Box<dyn Presenter>,
    sink: Box<dyn EventSink>,
    paddle_target: Vec3,
    remote_paddle: RemotePaddle,
    flash: PaddleFlash,
    swinging: bool,
    countdown_next: u8,
    countdown_value: Option<u8>,
    player_requested_restart: bool,
    opponent_requested_restart: bool,
    player_requested_countdown: bool,
    opponent_requested_countdown: bool,
    ball_has_hit_enemy_table: bool,
    tab_active: bool,
    menu_visible: bool,
    message_visible: bool,
}

impl Session {
    pub fn new(config: Config, presenter: Box<dyn Presenter>, sink: Box<dyn EventSink>) -> Self {
        let paddle_target = Vec3::new(0.0, config.paddle_rest_y(), config.paddle_position_z);
        let remote_paddle = RemotePaddle::new(mirror_position(paddle_target, config.table_position_z));

        Self {
            physics: PhysicsWorld::new(config),
            fsm: PhaseMachine::new(),
            clock: FrameClock::new(),
            timers: Timers::new(),
            session_timers: SessionTimers::default(),
            score: Score::new(),
            transport: None,
            role: None,
            presenter,
            sink,
            paddle_target,
            remote_paddle,
            flash: PaddleFlash::default(),
            swinging: false,
            countdown_next: COUNTDOWN_START,
            countdown_value: None,
            player_requested_restart: false,
            opponent_requested_restart: false,
            player_requested_countdown: false,
            opponent_requested_countdown: false,
            ball_has_hit_enemy_table: false,
            tab_active: true,
            menu_visible: false,
            message_visible: false,
        }
    }

    /// Validate the config and run all loading tasks; `Menu` on success.
    ///
    /// On failure the session stays in `Preloader` and may be set up again.
    pub async fn setup(&mut self, tasks: Vec<SetupTask>) -> Result<(), SetupError> {
        if self.fsm.phase() != Phase::Preloader {
            return Err(SetupError::AlreadySetUp);
        }
        self.physics.config().validate()?;
        run_all(tasks).await?;

        self.fsm.transition(PhaseAction::AssetsLoaded);
        self.menu_visible = true;
        info!("session ready");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.fsm.phase()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn mode(&self) -> Mode {
        self.physics.config().mode
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn config(&self) -> &Config {
        self.physics.config()
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn paddle_target(&self) -> Vec3 {
        self.paddle_target
    }

    pub fn remote_paddle(&self) -> &RemotePaddle {
        &self.remote_paddle
    }

    pub fn countdown_value(&self) -> Option<u8> {
        self.countdown_value
    }

    pub fn ball_has_hit_enemy_table(&self) -> bool {
        self.ball_has_hit_enemy_table
    }

    pub fn miss_timeout_pending(&self) -> bool {
        self.session_timers.miss.is_some()
    }

    pub fn is_swinging(&self) -> bool {
        self.swinging
    }

    pub fn restart_requested(&self) -> (bool, bool) {
        (self.player_requested_restart, self.opponent_requested_restart)
    }

    // ------------------------------------------------------------------
    // Mode and lifecycle
    // ------------------------------------------------------------------

    /// Play against the peer behind `transport`. Call from the menu.
    pub fn set_multiplayer(&mut self, transport: Box<dyn Transport>) {
        let role = transport.role();
        info!(?role, "multiplayer");
        self.role = Some(role);
        self.transport = Some(transport);
        self.physics.set_mode(Mode::Multiplayer);
        self.remote_paddle.visible = true;
    }

    pub fn set_singleplayer(&mut self) {
        info!("singleplayer");
        self.role = None;
        self.transport = None;
        self.physics.set_mode(Mode::Singleplayer);
        self.remote_paddle.visible = false;
    }

    /// Start from the menu. In multiplayer the countdown waits for the peer.
    pub fn start_game(&mut self) {
        if self.fsm.phase() != Phase::Menu {
            warn!(phase = ?self.fsm.phase(), "start_game outside the menu");
            return;
        }
        match self.mode() {
            Mode::Singleplayer => self.start_countdown(),
            Mode::Multiplayer => {
                self.player_requested_countdown = true;
                self.with_transport(|t| t.send_request_countdown());
                self.try_start_countdown();
            }
        }
    }

    /// Local restart request; singleplayer needs no agreement
    pub fn request_restart(&mut self) {
        if !self.fsm.can_restart() {
            warn!(phase = ?self.fsm.phase(), "restart outside a match");
            return;
        }
        self.player_requested_restart = true;
        match self.mode() {
            Mode::Singleplayer => self.opponent_requested_restart = true,
            Mode::Multiplayer => self.with_transport(|t| t.send_restart_game()),
        }
        self.try_restart();
    }

    /// Back to the menu, dropping the peer link
    pub fn leave(&mut self) {
        if !self.fsm.transition(PhaseAction::Leave).success {
            return;
        }
        info!("left match");
        self.end_rally();
        self.score.reset();
        self.player_requested_restart = false;
        self.opponent_requested_restart = false;
        self.player_requested_countdown = false;
        self.opponent_requested_countdown = false;
        self.menu_visible = true;
        self.message_visible = false;
        if self.transport.is_some() {
            self.set_singleplayer();
        }
    }

    /// Hidden tabs keep ticking but simulate nothing
    pub fn set_tab_active(&mut self, active: bool) {
        self.tab_active = active;
    }

    // ------------------------------------------------------------------
    // Local input
    // ------------------------------------------------------------------

    /// Relative pointer move
    pub fn move_paddle_by(&mut self, dx: f32, dy: f32) {
        self.paddle_target = apply_pointer_delta(self.paddle_target, dx, dy, self.physics.config());
    }

    /// Absolute paddle placement, e.g. from a controller ray. The paddle
    /// keeps its resting height.
    pub fn set_paddle_target(&mut self, x: f32, z: f32) {
        self.paddle_target = Vec3::new(x, self.physics.config().paddle_rest_y(), z);
    }

    /// Pointer lock lost
    pub fn release_pointer(&mut self) {
        self.paddle_target = released_position(self.physics.config());
    }

    // ------------------------------------------------------------------
    // Frame loop
    // ------------------------------------------------------------------

    /// One display refresh
    pub fn tick(&mut self, timestamp_ms: f64) {
        if !self.tab_active {
            self.clock.suspend(timestamp_ms);
            return;
        }
        let delta_ms = self.clock.advance(timestamp_ms);
        let dt = (delta_ms / 1000.0) as f32;
        // Timers armed below count from the end of this frame
        self.timers.advance(delta_ms);

        let target = self.paddle_target;
        self.physics.set_paddle_position(target.x, target.y, target.z);

        if self.fsm.is_playing() {
            if self.mode() == Mode::Multiplayer {
                // Receiver sees our paddle mirrored in x
                self.with_transport(|t| t.send_move(-target.x, target.y));
            }
            self.physics.step(dt);
            self.physics.predict_collisions();
        }

        let events = self.physics.take_events();
        self.handle_physics_events(events);

        while let Some(id) = self.timers.pop_due() {
            if let Some(fired) = self.session_timers.classify(id) {
                self.on_timer(fired);
            }
        }

        self.drain_inbound();

        self.remote_paddle.update_interpolation(dt);
        self.flash.update(dt);
        self.check_hit_animation();

        let scene = self.scene_state();
        self.presenter.present_frame(&scene);
    }

    fn handle_physics_events(&mut self, events: PhysicsEvents) {
        if !self.fsm.is_playing() {
            return;
        }
        for event in &events {
            match *event {
                PhysicsEvent::Table(hit) => {
                    if self.physics.config().is_enemy_half(hit.point.z) {
                        self.ball_has_hit_enemy_table = true;
                    }
                    self.sink.emit(GameEvent::BallTableCollision { point: hit.point });
                }
                PhysicsEvent::Paddle(hit) => self.on_paddle_collision(hit),
                PhysicsEvent::Net => {}
            }
            if !self.fsm.is_playing() {
                break;
            }
        }
    }

    fn on_paddle_collision(&mut self, hit: PaddleHit) {
        let timeout = self.physics.config().miss_timeout_ms();
        self.session_timers.arm_miss(&mut self.timers, timeout);
        self.flash.trigger();
        self.ball_has_hit_enemy_table = false;
        self.sink.emit(GameEvent::BallPaddleCollision {
            position: hit.position,
            velocity: hit.velocity,
        });

        match self.mode() {
            Mode::Singleplayer => {
                self.score.increment(Side::Player);
                debug!(score = self.score.player, "paddle hit");
                self.check_win();
            }
            Mode::Multiplayer => {
                self.session_timers.queue_hit(&mut self.timers);
            }
        }
    }

    fn on_timer(&mut self, fired: Fired) {
        match fired {
            Fired::Countdown => self.on_countdown(),
            Fired::Miss => self.on_miss_timeout(),
            Fired::HitCooldown => self.swinging = false,
            Fired::SendHit => {
                if !self.fsm.is_playing() {
                    return;
                }
                if let Some(ball) = self.physics.ball_state() {
                    self.with_transport(|t| t.send_hit(ball.pos, ball.vel, false));
                }
            }
        }
    }

    fn check_hit_animation(&mut self) {
        let Some(ball) = self.physics.ball_state() else {
            return;
        };
        let paddle = self.physics.paddle();
        if self.session_timers.hit_cooldown.is_none()
            && (ball.pos - paddle.pos).length() < HIT_ANIMATION_DISTANCE
        {
            self.swinging = true;
            self.session_timers.arm_hit_cooldown(&mut self.timers);
        }
    }

    // ------------------------------------------------------------------
    // Countdown and serve
    // ------------------------------------------------------------------

    fn try_start_countdown(&mut self) {
        if self.fsm.phase() == Phase::Menu
            && self.player_requested_countdown
            && self.opponent_requested_countdown
        {
            self.start_countdown();
        }
    }

    fn start_countdown(&mut self) {
        if !self.fsm.transition(PhaseAction::StartCountdown).success {
            return;
        }
        info!("countdown");
        self.player_requested_countdown = false;
        self.opponent_requested_countdown = false;
        self.player_requested_restart = false;
        self.opponent_requested_restart = false;
        self.menu_visible = false;
        self.message_visible = false;
        self.countdown_next = COUNTDOWN_START;
        self.countdown_value = None;
        self.session_timers.arm_countdown(&mut self.timers);
    }

    fn on_countdown(&mut self) {
        let value = self.countdown_next;
        self.countdown_value = Some(value);
        self.sink.emit(GameEvent::Countdown(value));
        if value > 0 {
            self.countdown_next = value - 1;
            return;
        }

        self.session_timers.cancel_countdown(&mut self.timers);
        self.countdown_value = None;
        self.serve();
    }

    fn serve(&mut self) {
        match (self.mode(), self.role) {
            (Mode::Multiplayer, Some(Role::Host)) => {
                debug!("waiting for the guest to serve");
            }
            (Mode::Multiplayer, _) => {
                self.add_ball(true);
                self.physics.init_ball_position();
                if let Some(ball) = self.physics.ball_state() {
                    self.with_transport(|t| t.send_hit(ball.pos, ball.vel, true));
                }
            }
            (Mode::Singleplayer, _) => {
                self.add_ball(true);
                self.physics.init_ball_position();
            }
        }
    }

    /// Idempotent; a locally created ball also arms the miss-timeout
    fn add_ball(&mut self, local: bool) {
        let existed = self.physics.has_ball();
        self.physics.add_ball();
        if self.fsm.phase() == Phase::Countdown {
            self.session_timers.cancel_countdown(&mut self.timers);
            self.countdown_value = None;
            self.fsm.transition(PhaseAction::BallServed);
            info!("playing");
        }
        if local && !existed {
            let timeout = self.physics.config().miss_timeout_ms();
            self.session_timers.arm_miss(&mut self.timers, timeout);
        }
    }

    // ------------------------------------------------------------------
    // Scoring
    // ------------------------------------------------------------------

    fn on_miss_timeout(&mut self) {
        if !self.fsm.is_playing() {
            return;
        }
        match self.mode() {
            Mode::Singleplayer => {
                // Practice fault: the streak starts over
                self.score.player = 0;
                self.physics.init_ball_position();
            }
            Mode::Multiplayer => {
                let flag = self.ball_has_hit_enemy_table;
                if flag {
                    self.score.increment(Side::Player);
                } else {
                    self.score.increment(Side::Opponent);
                }
                info!(
                    player = self.score.player,
                    opponent = self.score.opponent,
                    "point after timeout"
                );
                self.ball_has_hit_enemy_table = false;

                let before = self.physics.ball_state();
                let over = self.check_win();
                let sent = if over {
                    before
                } else {
                    self.physics.init_ball_position();
                    self.physics.ball_state()
                };
                if let Some(ball) = sent {
                    self.with_transport(|t| t.send_miss(ball.pos, ball.vel, flag));
                }
                if over {
                    return;
                }
            }
        }
        if self.fsm.is_playing() {
            let timeout = self.physics.config().miss_timeout_ms();
            self.session_timers.arm_miss(&mut self.timers, timeout);
        }
    }

    /// Game over once either side reaches `points_for_win`
    fn check_win(&mut self) -> bool {
        let points = self.physics.config().points_for_win;
        let Some(winner) = self.score.has_winner(points) else {
            return false;
        };
        if self.fsm.transition(PhaseAction::GameOver).success {
            info!(?winner, player = self.score.player, opponent = self.score.opponent, "game over");
            self.end_rally();
            self.message_visible = true;
            self.sink.emit(GameEvent::GameOver(self.score));
        }
        true
    }

    fn try_restart(&mut self) {
        if !(self.player_requested_restart && self.opponent_requested_restart) {
            return;
        }
        if !self.fsm.can_restart() {
            return;
        }
        info!("restart");
        self.sink.emit(GameEvent::RestartGame(self.score));
        self.player_requested_restart = false;
        self.opponent_requested_restart = false;
        self.score.reset();
        self.end_rally();
        self.start_countdown();
    }

    /// Ball gone, match timers cancelled
    fn end_rally(&mut self) {
        self.physics.remove_ball();
        self.session_timers.cancel_match(&mut self.timers);
        self.countdown_value = None;
        self.ball_has_hit_enemy_table = false;
    }

    fn peer_lost(&mut self) {
        if !self.fsm.transition(PhaseAction::PeerLost).success {
            return;
        }
        warn!("peer lost");
        self.end_rally();
        self.message_visible = true;
        self.sink.emit(GameEvent::PeerLost);
    }

    // ------------------------------------------------------------------
    // Peer link
    // ------------------------------------------------------------------

    fn with_transport(&mut self, op: impl FnOnce(&mut dyn Transport) -> Result<(), TransportError>) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        match op(transport.as_mut()) {
            Ok(()) => {}
            Err(TransportError::Disconnected) => self.peer_lost(),
            Err(err) => warn!(%err, "send failed"),
        }
    }

    fn drain_inbound(&mut self) {
        loop {
            if self.fsm.phase() == Phase::PeerLost {
                return;
            }
            let Some(transport) = self.transport.as_mut() else {
                return;
            };
            match transport.try_recv() {
                Ok(Some(msg)) => {
                    debug!(kind = msg.kind(), "recv");
                    self.handle_message(msg);
                }
                Ok(None) => return,
                Err(TransportError::Disconnected) => {
                    self.peer_lost();
                    return;
                }
                Err(err) => warn!(%err, "dropping frame"),
            }
        }
    }

    /// Apply one message from the peer
    pub(crate) fn handle_message(&mut self, msg: PeerMsg) {
        match msg {
            PeerMsg::Move { x, y } => self.remote_paddle.set_target(x, y),
            PeerMsg::Hit {
                point,
                velocity,
                add_ball,
            } => self.received_hit(point, velocity, add_ball),
            PeerMsg::Miss {
                point,
                velocity,
                ball_has_hit_enemy_table,
            } => self.received_miss(point, velocity, ball_has_hit_enemy_table),
            PeerMsg::RestartGame => {
                if !self.fsm.can_restart() {
                    debug!(phase = ?self.fsm.phase(), "ignoring restart request");
                    return;
                }
                self.opponent_requested_restart = true;
                self.try_restart();
            }
            PeerMsg::RequestCountdown => {
                if !matches!(self.fsm.phase(), Phase::Preloader | Phase::Menu) {
                    debug!(phase = ?self.fsm.phase(), "ignoring countdown request");
                    return;
                }
                self.opponent_requested_countdown = true;
                self.try_start_countdown();
            }
        }
    }

    fn received_hit(&mut self, point: Vec3Wire, velocity: Vec3Wire, add_ball: bool) {
        if !self.fsm.accepts_ball_updates() {
            debug!(phase = ?self.fsm.phase(), "ignoring hit");
            return;
        }
        self.session_timers.cancel_miss(&mut self.timers);
        if add_ball {
            self.add_ball(false);
        }
        let table_z = self.physics.config().table_position_z;
        let pos = mirror_position(from_wire(point), table_z);
        let vel = mirror_velocity(from_wire(velocity));
        if !self.physics.set_ball_state(pos, vel) {
            warn!("hit without a ball");
        }
    }

    fn received_miss(&mut self, point: Vec3Wire, velocity: Vec3Wire, sender_hit_enemy_table: bool) {
        if !self.fsm.is_playing() {
            debug!(phase = ?self.fsm.phase(), "ignoring miss");
            return;
        }
        self.session_timers.cancel_miss(&mut self.timers);
        // The sender's enemy half is ours
        if sender_hit_enemy_table {
            self.score.increment(Side::Opponent);
        } else {
            self.score.increment(Side::Player);
        }
        info!(
            player = self.score.player,
            opponent = self.score.opponent,
            "point from peer"
        );
        self.ball_has_hit_enemy_table = false;
        if !self.check_win() {
            self.received_hit(point, velocity, false);
        }
    }

    // ------------------------------------------------------------------
    // Presentation
    // ------------------------------------------------------------------

    pub fn scene_state(&self) -> SceneState {
        let config = self.physics.config();
        let paddle = self.physics.paddle();
        let color_scheme = ColorScheme::for_session(config.mode, self.role);
        let in_match = !matches!(self.fsm.phase(), Phase::Preloader | Phase::Menu);

        SceneState {
            phase: self.fsm.phase(),
            ball: self.physics.ball_state().map(|ball| ball.pos),
            paddle: PaddleView {
                position: paddle.pos,
                rotation_z: paddle.rotation_z,
                visible: self.fsm.phase() != Phase::Preloader,
            },
            remote_paddle: PaddleView {
                position: self.remote_paddle.position(),
                rotation_z: self.remote_paddle.rotation_z(),
                visible: self.remote_paddle.visible && in_match,
            },
            paddle_flash: self.flash.opacity(),
            swinging: self.swinging,
            score: self.score,
            opponent_score_visible: config.mode == Mode::Multiplayer,
            countdown: self.countdown_value,
            menu_visible: self.menu_visible,
            message_visible: self.message_visible,
            color_scheme,
            background_color: color_scheme.background(&config.colors),
            table_color: color_scheme.table(&config.colors),
        }
    }
}
