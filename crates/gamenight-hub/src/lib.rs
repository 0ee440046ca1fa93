//! Room registry and broadcast fan-out.
//!
//! The hub is a single Tokio task that owns the map of rooms to live
//! connections. Everything goes through its command channel — register,
//! unregister, broadcast, occupancy — so operations are applied in
//! submission order and there is no shared mutable state to lock.
//!
//! Delivery is best-effort: each connection gets a bounded outbound
//! buffer, and a recipient whose buffer is full or closed is treated as
//! dead and dropped on the spot. A slow peer can never stall the loop
//! or the other members of its room.

mod conn;
mod error;
mod hub;

pub use conn::{connect, OUTBOUND_BUFFER};
pub use error::HubError;
pub use hub::{spawn_hub, HubHandle, Registration};
