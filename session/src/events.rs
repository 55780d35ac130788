//! Typed match events for outside subscribers

use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;
use table_core::Score;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Final score, emitted once per match
    GameOver(Score),
    /// Score at the moment both players agreed to restart
    RestartGame(Score),
    BallPaddleCollision { position: Vec3, velocity: Vec3 },
    BallTableCollision { point: Vec3 },
    /// Countdown value shown (2, 1, 0)
    Countdown(u8),
    PeerLost,
}

/// Receiver for session events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Sink that drops everything
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Recording sink; clones share one log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|event| pred(event)).count()
    }

    /// Take everything recorded so far
    pub fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: GameEvent) {
        self.events.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_log() {
        let log = EventLog::new();
        let mut sink = log.clone();
        sink.emit(GameEvent::Countdown(2));
        sink.emit(GameEvent::PeerLost);

        assert_eq!(log.count(|e| matches!(e, GameEvent::Countdown(_))), 1);
        assert_eq!(log.drain().len(), 2);
        assert!(log.events().is_empty());
    }
}
