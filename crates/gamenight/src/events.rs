//! Server-originated game events.
//!
//! Round orchestration lives outside this crate, but whatever drives
//! the rounds needs a way to push events through the same fan-out path
//! as player messages. [`GameEvent`] enumerates those events and
//! [`broadcast_event`] injects one into a room.

use gamenight_hub::HubHandle;
use gamenight_protocol::{Codec, Envelope, JsonCodec, RoomId};
use gamenight_scoring::ScoreboardEntry;
use serde_json::json;

use crate::ServerError;

/// An event pushed by the server into a room.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A round begins. `letter` is set for petit bac rounds.
    RoundStart {
        round: u32,
        total_rounds: u32,
        letter: Option<char>,
    },
    /// A round is over; clients should stop accepting input.
    RoundEnd { round: u32 },
    /// Standings changed mid-game.
    ScoreboardUpdate { scoreboard: Vec<ScoreboardEntry> },
    /// The session is over; final standings.
    GameEnd { scoreboard: Vec<ScoreboardEntry> },
}

impl GameEvent {
    /// The envelope kind clients switch on.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoundStart { .. } => "round_start",
            Self::RoundEnd { .. } => "round_end",
            Self::ScoreboardUpdate { .. } => "scoreboard_update",
            Self::GameEnd { .. } => "game_end",
        }
    }

    /// Wraps the event in a server-stamped envelope.
    pub fn into_envelope(self) -> Envelope {
        let kind = self.kind();
        let content = match self {
            Self::RoundStart {
                round,
                total_rounds,
                letter,
            } => json!({
                "round": round,
                "total_rounds": total_rounds,
                "letter": letter,
            }),
            Self::RoundEnd { round } => json!({ "round": round }),
            Self::ScoreboardUpdate { scoreboard }
            | Self::GameEnd { scoreboard } => json!({ "scoreboard": scoreboard }),
        };
        Envelope::server(kind, content)
    }
}

/// Broadcasts a game event to every connection in a room.
pub async fn broadcast_event(
    hub: &HubHandle,
    room_id: RoomId,
    event: GameEvent,
) -> Result<(), ServerError> {
    let envelope = event.into_envelope();
    let payload = JsonCodec.encode(&envelope)?;
    hub.broadcast(room_id, payload, None).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamenight_protocol::{UserId, SERVER_SENDER};

    #[test]
    fn test_round_start_envelope_shape() {
        let env = GameEvent::RoundStart {
            round: 2,
            total_rounds: 5,
            letter: Some('K'),
        }
        .into_envelope();

        assert_eq!(env.kind, "round_start");
        assert_eq!(env.from, SERVER_SENDER);
        assert_eq!(env.user_id, UserId(0));
        assert_eq!(env.content["round"], 2);
        assert_eq!(env.content["letter"], "K");
    }

    #[test]
    fn test_round_start_without_letter() {
        let env = GameEvent::RoundStart {
            round: 1,
            total_rounds: 3,
            letter: None,
        }
        .into_envelope();
        assert!(env.content["letter"].is_null());
    }

    #[test]
    fn test_game_end_carries_scoreboard() {
        let env = GameEvent::GameEnd {
            scoreboard: vec![ScoreboardEntry {
                user_id: UserId(1),
                display_name: "alice".into(),
                total: 175,
            }],
        }
        .into_envelope();

        assert_eq!(env.kind, "game_end");
        assert_eq!(env.content["scoreboard"][0]["display_name"], "alice");
        assert_eq!(env.content["scoreboard"][0]["total"], 175);
    }
}
