use gamenight_lobby::LobbyError;
use gamenight_protocol::RoomId;

/// Errors produced by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A lifecycle rule rejected the operation.
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// The underlying database operation failed.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// The blindtest playlist is not one of the supported ones.
    #[error("invalid playlist: {0}")]
    InvalidPlaylist(String),

    /// The room has no configuration for the requested game.
    #[error("no game configuration for room {0}")]
    ConfigNotFound(RoomId),

    /// A stored value does not parse back into its domain type.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}
