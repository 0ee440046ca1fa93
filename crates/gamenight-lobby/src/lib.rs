//! Room lifecycle for Gamenight: the domain model and its rules.
//!
//! Rooms move through a two-state machine (`waiting` → `playing`).
//! Membership rules are pure functions on the [`Room`] value, so the
//! store can run the same checks before touching the database and the
//! rules stay testable without one.

mod error;
mod room;

pub use error::LobbyError;
pub use room::{
    generate_join_code, Player, Room, RoomStatus, DEFAULT_CAPACITY,
    MIN_PLAYERS_TO_START,
};
