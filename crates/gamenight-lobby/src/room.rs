//! The room model: status machine, membership, and lifecycle rules.

use std::fmt;

use gamenight_protocol::{GameType, RoomId, UserId};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::LobbyError;

/// Default maximum number of players per room.
pub const DEFAULT_CAPACITY: usize = 10;

/// Minimum members before the host can meaningfully start a game.
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Lifecycle state of a room.
///
/// There are exactly two states and one transition: a room is created
/// `Waiting` and the host moves it to `Playing`. It never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
}

impl RoomStatus {
    /// Parses the lowercase database representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(Self::Waiting),
            "playing" => Some(Self::Playing),
            _ => None,
        }
    }

    /// The lowercase name stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A member of a room, in join order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub user_id: UserId,
    pub display_name: String,
    /// Join timestamp as recorded by the store; empty for rooms built
    /// in memory.
    #[serde(default)]
    pub joined_at: String,
}

/// A game room and its current membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Six-hex-char join code players type to find the room.
    pub code: String,
    pub game_type: GameType,
    pub host_id: UserId,
    pub capacity: usize,
    pub status: RoomStatus,
    #[serde(default)]
    pub created_at: String,
    /// Members in join order. The host is always the first entry of a
    /// freshly created room.
    pub players: Vec<Player>,
}

impl Room {
    /// Creates a waiting room with the host as its only member.
    pub fn new(
        id: RoomId,
        code: impl Into<String>,
        game_type: GameType,
        host_id: UserId,
        host_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            game_type,
            host_id,
            capacity: DEFAULT_CAPACITY,
            status: RoomStatus::Waiting,
            created_at: String::new(),
            players: vec![Player {
                user_id: host_id,
                display_name: host_name.into(),
                joined_at: String::new(),
            }],
        }
    }

    /// Whether the user is currently a member.
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.players.iter().any(|p| p.user_id == user_id)
    }

    /// Whether the game can start: enough members and still waiting.
    pub fn is_ready(&self) -> bool {
        self.players.len() >= MIN_PLAYERS_TO_START
            && self.status == RoomStatus::Waiting
    }

    /// Checks whether a user may join. The checks run in a fixed
    /// order, so a full, already-started room reports `RoomFull`.
    pub fn check_join(&self, user_id: UserId) -> Result<(), LobbyError> {
        if self.players.len() >= self.capacity {
            return Err(LobbyError::RoomFull(self.id));
        }
        if self.status != RoomStatus::Waiting {
            return Err(LobbyError::GameAlreadyStarted(self.id));
        }
        if self.is_member(user_id) {
            return Err(LobbyError::AlreadyJoined(user_id, self.id));
        }
        Ok(())
    }

    /// Checks whether a user may start the game.
    pub fn check_start(&self, caller: UserId) -> Result<(), LobbyError> {
        if caller != self.host_id {
            return Err(LobbyError::Forbidden);
        }
        Ok(())
    }

    /// Adds a member after running the join checks.
    pub fn join(
        &mut self,
        user_id: UserId,
        display_name: impl Into<String>,
    ) -> Result<(), LobbyError> {
        self.check_join(user_id)?;
        self.players.push(Player {
            user_id,
            display_name: display_name.into(),
            joined_at: String::new(),
        });
        Ok(())
    }

    /// Removes a member. Unconditional: leaving a room you are not in
    /// is a no-op, and leaving never changes the room status.
    pub fn leave(&mut self, user_id: UserId) {
        self.players.retain(|p| p.user_id != user_id);
    }

    /// Starts the game. Host only.
    pub fn start(&mut self, caller: UserId) -> Result<(), LobbyError> {
        self.check_start(caller)?;
        self.status = RoomStatus::Playing;
        Ok(())
    }
}

/// Generates a six-hex-char join code from three random bytes.
pub fn generate_join_code() -> String {
    let bytes: [u8; 3] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
