//! WebSocket transport layer for Gamenight.
//!
//! A [`WsListener`] accepts sockets; each [`WsConnection`] splits into a
//! [`WsWriter`] and a [`WsReader`] so the outbound and inbound pumps can
//! run as independent tasks. The halves own their side of the stream —
//! no shared lock, so a slow reader never blocks a send.

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WsConnection, WsListener, WsReader, WsWriter};

use std::fmt;

/// Opaque identifier for an accepted connection.
///
/// Registrations in the hub are tagged with this so that a replaced
/// connection's late cleanup cannot evict its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_equality() {
        let a = ConnectionId::new(1);
        let b = ConnectionId::new(1);
        let c = ConnectionId::new(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
