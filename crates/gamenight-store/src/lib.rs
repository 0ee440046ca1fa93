//! SQLite persistence for Gamenight.
//!
//! The store owns a connection pool and exposes the room lifecycle,
//! score recording, and per-game configuration as async operations.
//! Lifecycle rules are checked through `gamenight-lobby` before any
//! write, and the UNIQUE constraints back the same rules up at the
//! database level for racing writers.

mod error;
mod games;
mod rooms;
mod scores;

pub use error::StoreError;
pub use games::{
    BlindtestConfig, Category, PetitbacConfig, DEFAULT_RESPONSE_TIME,
    PLAYLISTS,
};

use gamenight_protocol::UserId;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// The schema, applied idempotently on connect.
const SCHEMA: &str = include_str!("schema.sql");

/// Handle to the Gamenight database. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Connects to the database at `url` and applies the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Connects to a fresh in-memory database, for tests.
    ///
    /// A single connection, because every pooled connection to
    /// `sqlite::memory:` would otherwise get its own empty database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        tracing::info!("database schema applied");
        Ok(())
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates a user with the given display name and returns its id.
    pub async fn create_user(&self, pseudo: &str) -> Result<UserId, StoreError> {
        let result = sqlx::query("INSERT INTO users (pseudo) VALUES (?)")
            .bind(pseudo)
            .execute(&self.pool)
            .await?;
        Ok(UserId(result.last_insert_rowid()))
    }

    /// Looks up a user's display name.
    pub async fn user_pseudo(&self, user_id: UserId) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT pseudo FROM users WHERE id = ?")
                .bind(user_id.0)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(pseudo,)| pseudo))
    }
}
