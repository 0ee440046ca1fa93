//! # Gamenight
//!
//! Real-time coordination backend for multi-party game sessions:
//! code-addressable rooms, broadcast messaging with server-stamped
//! identity, and persistent scoring for the `blindtest` and `petitbac`
//! mini-games.
//!
//! This meta crate ties the layers together: transport → protocol →
//! hub, with the lobby rules and the store behind the join handshake.
//! Authentication is pluggable through the [`Authenticator`] trait —
//! the embedding application validates credentials and issues tokens;
//! Gamenight only asks it who a token belongs to.
//!
//! ```rust,no_run
//! use gamenight::{GameServer, Store};
//!
//! # struct MyAuth;
//! # impl gamenight::Authenticator for MyAuth {
//! #     async fn authenticate(
//! #         &self,
//! #         _token: &str,
//! #     ) -> Result<gamenight::Identity, gamenight::AuthError> {
//! #         unimplemented!()
//! #     }
//! # }
//! # async fn run() -> Result<(), gamenight::ServerError> {
//! let store = Store::connect("sqlite:gamenight.db?mode=rwc").await?;
//! let server = GameServer::<MyAuth>::builder()
//!     .bind("0.0.0.0:8080")
//!     .build(store, MyAuth)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod auth;
mod error;
mod events;
mod handler;
mod server;

pub use auth::{AuthError, Authenticator};
pub use error::ServerError;
pub use events::{broadcast_event, GameEvent};
pub use server::{GameServer, GameServerBuilder};

pub use gamenight_hub::HubHandle;
pub use gamenight_lobby::{Player, Room, RoomStatus};
pub use gamenight_protocol::{
    Envelope, GameType, Identity, JsonCodec, RoomId, UserId,
};
pub use gamenight_scoring::ScoreboardEntry;
pub use gamenight_store::{Store, StoreError};
