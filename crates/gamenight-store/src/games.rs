//! Per-game room configuration: blindtest playlists and petit bac
//! categories.

use gamenight_protocol::RoomId;

use crate::{Store, StoreError};

/// Playlists a blindtest room can be configured with.
pub const PLAYLISTS: [&str; 3] = ["Rock", "Rap", "Pop"];

/// Seconds to answer when the room does not override it.
pub const DEFAULT_RESPONSE_TIME: u32 = 37;

/// Blindtest settings for one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlindtestConfig {
    pub room_id: RoomId,
    pub playlist: String,
    pub response_time: u32,
    pub nbr_rounds: u32,
}

/// Petit bac settings for one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitbacConfig {
    pub room_id: RoomId,
    pub response_time: u32,
    pub nbr_rounds: u32,
}

/// A petit bac answer category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl Store {
    /// Sets (or replaces) a room's blindtest configuration.
    ///
    /// `response_time` falls back to [`DEFAULT_RESPONSE_TIME`] when not
    /// given.
    pub async fn set_blindtest_config(
        &self,
        room_id: RoomId,
        playlist: &str,
        nbr_rounds: u32,
        response_time: Option<u32>,
    ) -> Result<(), StoreError> {
        if !PLAYLISTS.contains(&playlist) {
            return Err(StoreError::InvalidPlaylist(playlist.to_string()));
        }
        let response_time = response_time.unwrap_or(DEFAULT_RESPONSE_TIME);

        sqlx::query(
            "INSERT INTO blindtest_config (room_id, playlist, response_time, nbr_rounds) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(room_id) DO UPDATE SET \
             playlist = excluded.playlist, \
             response_time = excluded.response_time, \
             nbr_rounds = excluded.nbr_rounds",
        )
        .bind(room_id.0)
        .bind(playlist)
        .bind(i64::from(response_time))
        .bind(i64::from(nbr_rounds))
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Reads a room's blindtest configuration.
    pub async fn blindtest_config(
        &self,
        room_id: RoomId,
    ) -> Result<BlindtestConfig, StoreError> {
        let row: Option<(String, i64, i64)> = sqlx::query_as(
            "SELECT playlist, response_time, nbr_rounds \
             FROM blindtest_config WHERE room_id = ?",
        )
        .bind(room_id.0)
        .fetch_optional(self.pool())
        .await?;

        let Some((playlist, response_time, nbr_rounds)) = row else {
            return Err(StoreError::ConfigNotFound(room_id));
        };

        Ok(BlindtestConfig {
            room_id,
            playlist,
            response_time: response_time.max(0) as u32,
            nbr_rounds: nbr_rounds.max(0) as u32,
        })
    }

    /// Sets (or replaces) a room's petit bac configuration.
    pub async fn set_petitbac_config(
        &self,
        room_id: RoomId,
        response_time: u32,
        nbr_rounds: u32,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO petitbac_config (room_id, response_time, nbr_rounds) \
             VALUES (?, ?, ?) \
             ON CONFLICT(room_id) DO UPDATE SET \
             response_time = excluded.response_time, \
             nbr_rounds = excluded.nbr_rounds",
        )
        .bind(room_id.0)
        .bind(i64::from(response_time))
        .bind(i64::from(nbr_rounds))
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Reads a room's petit bac configuration.
    pub async fn petitbac_config(
        &self,
        room_id: RoomId,
    ) -> Result<PetitbacConfig, StoreError> {
        let row: Option<(i64, i64)> = sqlx::query_as(
            "SELECT response_time, nbr_rounds FROM petitbac_config WHERE room_id = ?",
        )
        .bind(room_id.0)
        .fetch_optional(self.pool())
        .await?;

        let Some((response_time, nbr_rounds)) = row else {
            return Err(StoreError::ConfigNotFound(room_id));
        };

        Ok(PetitbacConfig {
            room_id,
            response_time: response_time.max(0) as u32,
            nbr_rounds: nbr_rounds.max(0) as u32,
        })
    }

    /// Adds an answer category to a petit bac room and returns its id.
    pub async fn add_category(
        &self,
        room_id: RoomId,
        name: &str,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO petitbac_categories (room_id, category_name) VALUES (?, ?)",
        )
        .bind(room_id.0)
        .bind(name)
        .execute(self.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Lists a room's categories in creation order.
    pub async fn categories(
        &self,
        room_id: RoomId,
    ) -> Result<Vec<Category>, StoreError> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT id, category_name FROM petitbac_categories \
             WHERE room_id = ? ORDER BY id ASC",
        )
        .bind(room_id.0)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    /// Renames a category.
    pub async fn rename_category(
        &self,
        category_id: i64,
        name: &str,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE petitbac_categories SET category_name = ? WHERE id = ?")
            .bind(name)
            .bind(category_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Deletes a category.
    pub async fn delete_category(&self, category_id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM petitbac_categories WHERE id = ?")
            .bind(category_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
