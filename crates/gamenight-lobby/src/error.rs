use gamenight_protocol::{RoomId, UserId};

/// Errors produced by the room lifecycle rules.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LobbyError {
    /// No room matches the given code or id.
    #[error("room not found")]
    NotFound,

    /// The room is at capacity.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// The game already started; the room no longer accepts members.
    #[error("game already started in room {0}")]
    GameAlreadyStarted(RoomId),

    /// The user is already a member of the room.
    #[error("player {0} already joined room {1}")]
    AlreadyJoined(UserId, RoomId),

    /// Only the host may perform this operation.
    #[error("only the host may start the game")]
    Forbidden,

    /// The game type string is not one of the supported games.
    #[error("invalid game type: {0}")]
    InvalidGameType(String),
}
