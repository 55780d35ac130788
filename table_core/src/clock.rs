//! Frame clock and cancellable timers.
//!
//! The render loop hands in display-refresh timestamps; `FrameClock` turns
//! them into clamped frame deltas. `Timers` is advanced by the same deltas
//! at the start of each frame, so countdowns and timeouts run on simulation
//! time and freeze while the tab is hidden.

use crate::params::Params;

/// Converts refresh timestamps into simulation deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_frame_ms: f64,
    elapsed_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_frame(Params::MAX_FRAME_MS)
    }

    pub fn with_max_frame(max_frame_ms: f64) -> Self {
        Self {
            last_ms: None,
            max_frame_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Delta in milliseconds since the previous frame, clamped to
    /// `[0, max_frame_ms]`. The first frame yields zero.
    pub fn advance(&mut self, timestamp_ms: f64) -> f64 {
        let delta = match self.last_ms {
            Some(last) => (timestamp_ms - last).clamp(0.0, self.max_frame_ms),
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        self.elapsed_ms += delta;
        delta
    }

    /// Record a frame that produces no simulation time
    pub fn suspend(&mut self, timestamp_ms: f64) {
        self.last_ms = Some(timestamp_ms);
    }

    /// Simulated time so far
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a pending timeout or interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct TimerEntry {
    id: TimerId,
    due_ms: f64,
    period_ms: Option<f64>,
}

/// Cancellable timeouts and intervals driven by `advance`
#[derive(Debug, Clone, Default)]
pub struct Timers {
    now_ms: f64,
    next_id: u64,
    entries: Vec<TimerEntry>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn set_timeout(&mut self, delay_ms: f64) -> TimerId {
        self.insert(delay_ms.max(0.0), None)
    }

    /// Fires every `period_ms` until cleared
    pub fn set_interval(&mut self, period_ms: f64) -> TimerId {
        // A zero period would fire forever within one advance
        let period = period_ms.max(1.0);
        self.insert(period, Some(period))
    }

    fn insert(&mut self, delay_ms: f64, period_ms: Option<f64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms,
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cleared.
    pub fn clear(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move the timer clock forward. Call `pop_due` afterwards.
    pub fn advance(&mut self, delta_ms: f64) {
        self.now_ms += delta_ms.max(0.0);
    }

    /// Next timer that is due, earliest first (ties by creation order).
    ///
    /// Timers are handed out one at a time so the caller can cancel or
    /// re-arm others before they fire.
    pub fn pop_due(&mut self) -> Option<TimerId> {
        let now = self.now_ms;
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_ms <= now)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(index, _)| index)?;

        let entry = &mut self.entries[index];
        let id = entry.id;
        match entry.period_ms {
            Some(period) => entry.due_ms += period,
            None => {
                self.entries.swap_remove(index);
            }
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut Timers) -> Vec<TimerId> {
        std::iter::from_fn(|| timers.pop_due()).collect()
    }

    #[test]
    fn first_frame_has_no_delta() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(1000.0), 0.0);
        assert_eq!(clock.advance(1016.0), 16.0);
    }

    #[test]
    fn frame_delta_is_clamped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(5000.0), Params::MAX_FRAME_MS);
        assert_eq!(clock.elapsed_ms(), Params::MAX_FRAME_MS);
    }

    #[test]
    fn suspended_frames_are_not_counted() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.suspend(10_000.0);
        clock.suspend(20_000.0);
        assert_eq!(clock.advance(20_016.0), 16.0);
        assert_eq!(clock.elapsed_ms(), 16.0);
    }

    #[test]
    fn backwards_timestamp_yields_zero() {
        let mut clock = FrameClock::new();
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0), 0.0);
    }

    #[test]
    fn timeout_fires_once() {
        let mut timers = Timers::new();
        let id = timers.set_timeout(100.0);
        timers.advance(99.0);
        assert_eq!(timers.pop_due(), None);
        timers.advance(1.0);
        assert_eq!(timers.pop_due(), Some(id));
        assert_eq!(timers.pop_due(), None);
        assert!(!timers.is_pending(id));
    }

    #[test]
    fn interval_keeps_firing_until_cleared() {
        let mut timers = Timers::new();
        let id = timers.set_interval(1000.0);
        timers.advance(2500.0);
        assert_eq!(drain(&mut timers), vec![id, id]);
        timers.advance(500.0);
        assert_eq!(drain(&mut timers), vec![id]);
        assert!(timers.clear(id));
        timers.advance(5000.0);
        assert!(drain(&mut timers).is_empty());
    }

    #[test]
    fn due_order_then_creation_order() {
        let mut timers = Timers::new();
        let late = timers.set_timeout(30.0);
        let early = timers.set_timeout(10.0);
        let tie = timers.set_timeout(10.0);
        timers.advance(50.0);
        assert_eq!(drain(&mut timers), vec![early, tie, late]);
    }

    #[test]
    fn cleared_timer_does_not_fire() {
        let mut timers = Timers::new();
        let id = timers.set_timeout(10.0);
        assert!(timers.clear(id));
        assert!(!timers.clear(id));
        timers.advance(20.0);
        assert_eq!(timers.pop_due(), None);
    }

    #[test]
    fn handler_can_cancel_sibling_before_it_fires() {
        let mut timers = Timers::new();
        let first = timers.set_timeout(10.0);
        let second = timers.set_timeout(20.0);
        timers.advance(30.0);
        assert_eq!(timers.pop_due(), Some(first));
        timers.clear(second);
        assert_eq!(timers.pop_due(), None);
    }

    #[test]
    fn timer_armed_during_drain_waits_for_its_delay() {
        let mut timers = Timers::new();
        let first = timers.set_timeout(10.0);
        timers.advance(10.0);
        assert_eq!(timers.pop_due(), Some(first));
        let rearmed = timers.set_timeout(10.0);
        assert_eq!(timers.pop_due(), None);
        timers.advance(10.0);
        assert_eq!(timers.pop_due(), Some(rearmed));
    }
}
