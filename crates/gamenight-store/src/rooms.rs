//! Room lifecycle operations: create, look up, join, leave, start.

use gamenight_lobby::{generate_join_code, LobbyError, Player, Room, RoomStatus};
use gamenight_protocol::{GameType, RoomId, UserId};

use crate::{Store, StoreError};

/// Attempts before giving up on a colliding join code.
const CODE_ATTEMPTS: usize = 5;

impl Store {
    /// Creates a room for the given game with `host` as its first
    /// member and returns it.
    pub async fn create_room(
        &self,
        game_type: &str,
        host: UserId,
    ) -> Result<Room, StoreError> {
        let game_type = GameType::parse(game_type)
            .ok_or_else(|| LobbyError::InvalidGameType(game_type.to_string()))?;

        let mut last_err = None;
        for _ in 0..CODE_ATTEMPTS {
            let code = generate_join_code();
            let result = sqlx::query(
                "INSERT INTO rooms (code, game_type, host_id) VALUES (?, ?, ?)",
            )
            .bind(&code)
            .bind(game_type.as_str())
            .bind(host.0)
            .execute(self.pool())
            .await;

            match result {
                Ok(inserted) => {
                    let room_id = RoomId(inserted.last_insert_rowid());
                    sqlx::query(
                        "INSERT INTO room_players (room_id, user_id) VALUES (?, ?)",
                    )
                    .bind(room_id.0)
                    .bind(host.0)
                    .execute(self.pool())
                    .await?;

                    tracing::info!(
                        room_id = %room_id,
                        %code,
                        game_type = %game_type,
                        host = %host,
                        "room created"
                    );
                    return self.room_by_code(&code).await;
                }
                // Code collision: draw another one.
                Err(e) if is_unique_violation(&e) => last_err = Some(e),
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_err.map_or(StoreError::Lobby(LobbyError::NotFound), Into::into))
    }

    /// Loads a room and its members, in join order.
    pub async fn room_by_code(&self, code: &str) -> Result<Room, StoreError> {
        let row: Option<(i64, String, String, i64, i64, String, String)> =
            sqlx::query_as(
                "SELECT id, code, game_type, host_id, max_players, status, \
                 created_at FROM rooms WHERE code = ?",
            )
            .bind(code)
            .fetch_optional(self.pool())
            .await?;

        let Some((id, code, game_type, host_id, max_players, status, created_at)) =
            row
        else {
            return Err(LobbyError::NotFound.into());
        };

        let game_type = GameType::parse(&game_type).ok_or_else(|| {
            StoreError::Corrupt(format!("unknown game type {game_type:?}"))
        })?;
        let status = RoomStatus::parse(&status).ok_or_else(|| {
            StoreError::Corrupt(format!("unknown room status {status:?}"))
        })?;

        let players: Vec<(i64, String, String)> = sqlx::query_as(
            "SELECT rp.user_id, u.pseudo, rp.joined_at \
             FROM room_players rp JOIN users u ON u.id = rp.user_id \
             WHERE rp.room_id = ? ORDER BY rp.joined_at ASC, rp.id ASC",
        )
        .bind(id)
        .fetch_all(self.pool())
        .await?;

        Ok(Room {
            id: RoomId(id),
            code,
            game_type,
            host_id: UserId(host_id),
            capacity: max_players.max(0) as usize,
            status,
            created_at,
            players: players
                .into_iter()
                .map(|(user_id, display_name, joined_at)| Player {
                    user_id: UserId(user_id),
                    display_name,
                    joined_at,
                })
                .collect(),
        })
    }

    /// Adds a user to the room behind `code` after running the join
    /// checks, and returns the updated room.
    pub async fn join_room(
        &self,
        code: &str,
        user: UserId,
    ) -> Result<Room, StoreError> {
        let room = self.room_by_code(code).await?;
        room.check_join(user)?;

        let result = sqlx::query(
            "INSERT INTO room_players (room_id, user_id) VALUES (?, ?)",
        )
        .bind(room.id.0)
        .bind(user.0)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => {}
            // A racing join slipped in between the check and the
            // insert; the UNIQUE(room_id, user_id) constraint catches it.
            Err(e) if is_unique_violation(&e) => {
                return Err(LobbyError::AlreadyJoined(user, room.id).into());
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(room_id = %room.id, user = %user, "player joined room");
        self.room_by_code(code).await
    }

    /// Removes a user from a room. Unconditional, like the lobby rule.
    pub async fn leave_room(
        &self,
        room_id: RoomId,
        user: UserId,
    ) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM room_players WHERE room_id = ? AND user_id = ?")
            .bind(room_id.0)
            .bind(user.0)
            .execute(self.pool())
            .await?;
        tracing::info!(room_id = %room_id, user = %user, "player left room");
        Ok(())
    }

    /// Moves a room to `playing`. Host only.
    pub async fn start_game(
        &self,
        room_id: RoomId,
        caller: UserId,
    ) -> Result<(), StoreError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT host_id FROM rooms WHERE id = ?")
                .bind(room_id.0)
                .fetch_optional(self.pool())
                .await?;

        let Some((host_id,)) = row else {
            return Err(LobbyError::NotFound.into());
        };
        if UserId(host_id) != caller {
            return Err(LobbyError::Forbidden.into());
        }

        sqlx::query("UPDATE rooms SET status = 'playing' WHERE id = ?")
            .bind(room_id.0)
            .execute(self.pool())
            .await?;

        tracing::info!(room_id = %room_id, host = %caller, "game started");
        Ok(())
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
