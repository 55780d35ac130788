//! Peer link contract and an in-process loopback pair.

use crate::error::TransportError;
use crate::sync::to_wire;
use glam::Vec3;
use proto::PeerMsg;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::debug;

/// Which end of the connection this peer is, fixed at connect time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Guest,
}

/// Ordered, reliable, at-most-once message delivery to the other peer.
///
/// Sends are fire-and-forget; `try_recv` never blocks.
pub trait Transport {
    fn role(&self) -> Role;

    fn send(&mut self, msg: &PeerMsg) -> Result<(), TransportError>;

    /// Next inbound message, `Ok(None)` when nothing is queued
    fn try_recv(&mut self) -> Result<Option<PeerMsg>, TransportError>;

    fn is_host(&self) -> bool {
        self.role() == Role::Host
    }

    fn send_move(&mut self, x: f32, y: f32) -> Result<(), TransportError> {
        self.send(&PeerMsg::Move { x, y })
    }

    fn send_hit(&mut self, point: Vec3, velocity: Vec3, add_ball: bool) -> Result<(), TransportError> {
        self.send(&PeerMsg::Hit {
            point: to_wire(point),
            velocity: to_wire(velocity),
            add_ball,
        })
    }

    fn send_miss(
        &mut self,
        point: Vec3,
        velocity: Vec3,
        ball_has_hit_enemy_table: bool,
    ) -> Result<(), TransportError> {
        self.send(&PeerMsg::Miss {
            point: to_wire(point),
            velocity: to_wire(velocity),
            ball_has_hit_enemy_table,
        })
    }

    fn send_restart_game(&mut self) -> Result<(), TransportError> {
        self.send(&PeerMsg::RestartGame)
    }

    fn send_request_countdown(&mut self) -> Result<(), TransportError> {
        self.send(&PeerMsg::RequestCountdown)
    }
}

#[derive(Debug)]
struct Link {
    to_host: VecDeque<Vec<u8>>,
    to_guest: VecDeque<Vec<u8>>,
    connected: bool,
}

/// One end of an in-process connection carrying postcard frames.
///
/// Clones share the same end, so a test can keep a handle to a transport
/// it has handed to a session.
#[derive(Debug, Clone)]
pub struct LoopbackTransport {
    role: Role,
    link: Rc<RefCell<Link>>,
}

impl LoopbackTransport {
    /// Connected (host, guest) pair
    pub fn pair() -> (Self, Self) {
        let link = Rc::new(RefCell::new(Link {
            to_host: VecDeque::new(),
            to_guest: VecDeque::new(),
            connected: true,
        }));
        (
            Self {
                role: Role::Host,
                link: Rc::clone(&link),
            },
            Self {
                role: Role::Guest,
                link,
            },
        )
    }

    /// Close both ends. Frames already queued are still delivered.
    pub fn disconnect(&self) {
        self.link.borrow_mut().connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.link.borrow().connected
    }

    /// Frames waiting to be received on this end
    pub fn pending(&self) -> usize {
        let link = self.link.borrow();
        match self.role {
            Role::Host => link.to_host.len(),
            Role::Guest => link.to_guest.len(),
        }
    }

    /// Queue raw bytes for the other end
    pub fn send_raw(&self, bytes: Vec<u8>) -> Result<(), TransportError> {
        let mut link = self.link.borrow_mut();
        if !link.connected {
            return Err(TransportError::Disconnected);
        }
        match self.role {
            Role::Host => link.to_guest.push_back(bytes),
            Role::Guest => link.to_host.push_back(bytes),
        }
        Ok(())
    }
}

impl Transport for LoopbackTransport {
    fn role(&self) -> Role {
        self.role
    }

    fn send(&mut self, msg: &PeerMsg) -> Result<(), TransportError> {
        let bytes = msg.to_bytes()?;
        debug!(role = ?self.role, kind = msg.kind(), len = bytes.len(), "send");
        self.send_raw(bytes)
    }

    fn try_recv(&mut self) -> Result<Option<PeerMsg>, TransportError> {
        let mut link = self.link.borrow_mut();
        let frame = match self.role {
            Role::Host => link.to_host.pop_front(),
            Role::Guest => link.to_guest.pop_front(),
        };
        match frame {
            Some(bytes) => Ok(Some(PeerMsg::from_bytes(&bytes)?)),
            None if link.connected => Ok(None),
            None => Err(TransportError::Disconnected),
        }
    }
}
