use glam::Vec3;

/// Which side of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Opponent,
}

/// Match score as seen by the local peer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub player: u8,
    pub opponent: u8,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Player => self.player = self.player.saturating_add(1),
            Side::Opponent => self.opponent = self.opponent.saturating_add(1),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_winner(&self, points_for_win: u8) -> Option<Side> {
        if self.player >= points_for_win {
            Some(Side::Player)
        } else if self.opponent >= points_for_win {
            Some(Side::Opponent)
        } else {
            None
        }
    }
}

/// Ball came off the local paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleHit {
    /// Post-collision ball state
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Ball touched the table (or the practice wall)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableHit {
    pub point: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    Paddle(PaddleHit),
    Table(TableHit),
    Net,
}

/// Collisions reported by one `PhysicsWorld::step`, in the order they happened
#[derive(Debug, Clone, Default)]
pub struct PhysicsEvents {
    events: Vec<PhysicsEvent>,
}

impl PhysicsEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PhysicsEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhysicsEvent> {
        self.events.iter()
    }

    pub fn paddle_hits(&self) -> impl Iterator<Item = &PaddleHit> {
        self.events.iter().filter_map(|event| match event {
            PhysicsEvent::Paddle(hit) => Some(hit),
            _ => None,
        })
    }

    pub fn table_hits(&self) -> impl Iterator<Item = &TableHit> {
        self.events.iter().filter_map(|event| match event {
            PhysicsEvent::Table(hit) => Some(hit),
            _ => None,
        })
    }

    pub fn net_hits(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, PhysicsEvent::Net))
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<'a> IntoIterator for &'a PhysicsEvents {
    type Item = &'a PhysicsEvent;
    type IntoIter = std::slice::Iter<'a, PhysicsEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
