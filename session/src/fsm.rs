//! Match phase state machine
//!
//! Owns the round phase. The session drives it with actions; invalid
//! actions leave the phase untouched.

/// Round phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Preloader,
    Menu,
    Countdown,
    Playing,
    GameOver,
    PeerLost,
}

/// Actions that trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
    AssetsLoaded,
    StartCountdown,
    BallServed,
    GameOver,
    PeerLost,
    Leave,
}

/// Result of a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub success: bool,
    pub from: Phase,
    pub to: Phase,
    pub action: PhaseAction,
}

/// Phase machine for one session
#[derive(Debug)]
pub struct PhaseMachine {
    phase: Phase,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Preloader,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Check if a transition is valid
    pub fn can_transition(&self, action: PhaseAction) -> bool {
        self.next_phase(action).is_some()
    }

    /// Attempt a transition
    pub fn transition(&mut self, action: PhaseAction) -> TransitionResult {
        let from = self.phase;
        match self.next_phase(action) {
            Some(to) => {
                self.phase = to;
                TransitionResult {
                    success: true,
                    from,
                    to,
                    action,
                }
            }
            None => TransitionResult {
                success: false,
                from,
                to: from,
                action,
            },
        }
    }

    fn next_phase(&self, action: PhaseAction) -> Option<Phase> {
        match (self.phase, action) {
            // From Preloader
            (Phase::Preloader, PhaseAction::AssetsLoaded) => Some(Phase::Menu),

            // Countdown from the menu, or a restart from any match phase
            (Phase::Menu, PhaseAction::StartCountdown) => Some(Phase::Countdown),
            (Phase::Countdown, PhaseAction::StartCountdown) => Some(Phase::Countdown),
            (Phase::Playing, PhaseAction::StartCountdown) => Some(Phase::Countdown),
            (Phase::GameOver, PhaseAction::StartCountdown) => Some(Phase::Countdown),

            // Ball in play
            (Phase::Countdown, PhaseAction::BallServed) => Some(Phase::Playing),

            // From Playing
            (Phase::Playing, PhaseAction::GameOver) => Some(Phase::GameOver),

            // Peer lost from any phase after setup
            (
                Phase::Menu | Phase::Countdown | Phase::Playing | Phase::GameOver,
                PhaseAction::PeerLost,
            ) => Some(Phase::PeerLost),

            // Back to the menu
            (
                Phase::Countdown | Phase::Playing | Phase::GameOver | Phase::PeerLost,
                PhaseAction::Leave,
            ) => Some(Phase::Menu),

            // Invalid transition
            _ => None,
        }
    }

    /// Check if the ball is in play
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Inbound ball updates are applied only around live play
    pub fn accepts_ball_updates(&self) -> bool {
        matches!(self.phase, Phase::Countdown | Phase::Playing)
    }

    /// A mutual restart may start a new countdown
    pub fn can_restart(&self) -> bool {
        matches!(
            self.phase,
            Phase::Countdown | Phase::Playing | Phase::GameOver
        )
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}
