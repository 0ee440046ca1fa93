//! Wire protocol for Gamenight: the message envelope exchanged over a
//! room's broadcast channel, identity newtypes, and the codec seam.
//!
//! The envelope body (`content`) is opaque to the coordination core —
//! clients define their own message kinds (`chat`, `answer_submitted`,
//! `validation_vote`, ...) and the server relays them verbatim. The only
//! fields the server touches are `from` and `user_id`, which it stamps
//! with the connection's authenticated identity before fan-out.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{Envelope, GameType, Identity, RoomId, UserId, SERVER_SENDER};
