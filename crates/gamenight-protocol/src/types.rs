//! Core protocol types: identity newtypes, game kinds, and the envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The `from` value stamped on server-originated envelopes.
pub const SERVER_SENDER: &str = "server";

/// Unique identifier for a user, assigned by the user store.
///
/// `#[serde(transparent)]` makes this serialize as a bare number,
/// so the wire format stays `"user_id": 42` rather than `{"0": 42}`.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U-{}", self.0)
    }
}

/// Unique identifier for a room, assigned by the room store.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// An authenticated identity: who a connection belongs to.
///
/// Produced by the auth layer during the join handshake and used to
/// stamp every envelope the connection submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub display_name: String,
}

/// The two supported mini-games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// Music-guessing game scored by finish position.
    Blindtest,
    /// Word-association game scored by peer validation.
    Petitbac,
}

impl GameType {
    /// Parses the lowercase wire/database name. Returns `None` for
    /// anything else — callers decide which error that maps to.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blindtest" => Some(Self::Blindtest),
            "petitbac" => Some(Self::Petitbac),
            _ => None,
        }
    }

    /// The lowercase name used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blindtest => "blindtest",
            Self::Petitbac => "petitbac",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broadcast message as it travels through a room.
///
/// `kind` is the discriminator clients switch on (`"chat"`,
/// `"round_start"`, ...); `content` is an opaque JSON body. `from` and
/// `user_id` default when missing on the wire because clients are not
/// trusted to send them: the server overwrites both via [`stamp`]
/// before re-broadcasting. Unknown fields (client-side timestamps and
/// the like) are ignored on decode.
///
/// [`stamp`]: Envelope::stamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message discriminator, `type` on the wire.
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name of the sender. Stamped server-side.
    #[serde(default)]
    pub from: String,
    /// Identity of the sender. Stamped server-side.
    #[serde(default)]
    pub user_id: UserId,
    /// Opaque message body.
    #[serde(default)]
    pub content: serde_json::Value,
}

impl Envelope {
    /// Builds a client-shaped envelope with the given kind and body.
    pub fn new(kind: impl Into<String>, content: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            from: String::new(),
            user_id: UserId::default(),
            content,
        }
    }

    /// Builds a server-originated envelope (`from = "server"`,
    /// `user_id = 0`).
    pub fn server(kind: impl Into<String>, content: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            from: SERVER_SENDER.to_string(),
            user_id: UserId(0),
            content,
        }
    }

    /// Overwrites the sender identity with the authenticated one,
    /// discarding whatever the client claimed.
    pub fn stamp(&mut self, user_id: UserId, display_name: &str) {
        self.user_id = user_id;
        self.from = display_name.to_string();
    }
}
