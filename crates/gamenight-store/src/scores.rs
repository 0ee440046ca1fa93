//! Round scores and scoreboard reads.
//!
//! Scores are append-only: a row per player per round. The scoreboard
//! is computed by reading rows back in insertion order and feeding them
//! to the pure aggregator, so repeated reads yield the same board.

use gamenight_protocol::{GameType, RoomId, UserId};
use gamenight_scoring::{aggregate, ScoreRow, ScoreboardEntry};

use crate::{Store, StoreError};

impl Store {
    /// Appends one round score for a player.
    pub async fn record_round_score(
        &self,
        room_id: RoomId,
        user: UserId,
        game_type: GameType,
        score: i64,
        round: u32,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO scores (room_id, user_id, game_type, score, round_number) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(room_id.0)
        .bind(user.0)
        .bind(game_type.as_str())
        .bind(score)
        .bind(i64::from(round))
        .execute(self.pool())
        .await?;

        tracing::debug!(
            room_id = %room_id,
            user = %user,
            game_type = %game_type,
            score,
            round,
            "round score recorded"
        );
        Ok(())
    }

    /// Computes the room scoreboard, optionally restricted to one game
    /// and/or one round.
    pub async fn scoreboard(
        &self,
        room_id: RoomId,
        game_type: Option<GameType>,
        round: Option<u32>,
    ) -> Result<Vec<ScoreboardEntry>, StoreError> {
        let rows = self.score_rows(room_id).await?;
        let filtered: Vec<ScoreRow> = rows
            .into_iter()
            .filter(|row| game_type.is_none_or(|g| row.game_type == g))
            .filter(|row| round.is_none_or(|r| row.round == r))
            .collect();
        Ok(aggregate(&filtered))
    }

    /// A player's total score in a room, across games and rounds.
    pub async fn player_total(
        &self,
        room_id: RoomId,
        user: UserId,
    ) -> Result<i64, StoreError> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(score), 0) FROM scores \
             WHERE room_id = ? AND user_id = ?",
        )
        .bind(room_id.0)
        .bind(user.0)
        .fetch_one(self.pool())
        .await?;
        Ok(total)
    }

    async fn score_rows(&self, room_id: RoomId) -> Result<Vec<ScoreRow>, StoreError> {
        let rows: Vec<(i64, String, String, i64, i64)> = sqlx::query_as(
            "SELECT s.user_id, u.pseudo, s.game_type, s.round_number, s.score \
             FROM scores s JOIN users u ON u.id = s.user_id \
             WHERE s.room_id = ? ORDER BY s.id ASC",
        )
        .bind(room_id.0)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|(user_id, display_name, game_type, round, score)| {
                let game_type =
                    GameType::parse(&game_type).ok_or_else(|| {
                        StoreError::Corrupt(format!(
                            "unknown game type {game_type:?}"
                        ))
                    })?;
                Ok(ScoreRow {
                    user_id: UserId(user_id),
                    display_name,
                    game_type,
                    round: round.max(0) as u32,
                    score,
                })
            })
            .collect()
    }
}
