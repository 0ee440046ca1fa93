//! The hub actor: an isolated Tokio task that owns the room registry.
//!
//! All mutation and fan-out is serialized through one mpsc channel,
//! so register/unregister/broadcast take effect in submission order.

use std::collections::HashMap;

use gamenight_protocol::{RoomId, UserId};
use gamenight_transport::ConnectionId;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use crate::HubError;

/// A connection announcing itself to the hub.
#[derive(Debug)]
pub struct Registration {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub display_name: String,
    pub conn_id: ConnectionId,
    /// Sending side of the connection's bounded outbound buffer. The
    /// hub keeps the only sender; dropping it closes the buffer, which
    /// the outbound pump observes as its shutdown signal.
    pub buffer: mpsc::Sender<String>,
}

/// Commands processed by the hub actor, in submission order.
enum HubCommand {
    Register(Registration),
    Unregister {
        room_id: RoomId,
        user_id: UserId,
        conn_id: ConnectionId,
    },
    Broadcast {
        room_id: RoomId,
        payload: String,
        exclude: Option<UserId>,
    },
    Occupancy {
        room_id: RoomId,
        reply: oneshot::Sender<usize>,
    },
}

/// Handle to the running hub actor. Cheap to clone.
#[derive(Clone)]
pub struct HubHandle {
    sender: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    /// Registers a connection under its `(room, user)` slot.
    ///
    /// Registering a pair that already has a slot replaces it: the old
    /// buffer is closed and the new connection takes over delivery.
    pub async fn register(&self, registration: Registration) -> Result<(), HubError> {
        self.sender
            .send(HubCommand::Register(registration))
            .await
            .map_err(|_| HubError::Closed)
    }

    /// Removes a connection's slot.
    ///
    /// The slot is only removed if it still belongs to `conn_id` — a
    /// replaced connection's late unregister must not evict its
    /// replacement. Unregistering an absent slot is a no-op.
    pub async fn unregister(
        &self,
        room_id: RoomId,
        user_id: UserId,
        conn_id: ConnectionId,
    ) -> Result<(), HubError> {
        self.sender
            .send(HubCommand::Unregister {
                room_id,
                user_id,
                conn_id,
            })
            .await
            .map_err(|_| HubError::Closed)
    }

    /// Queues a payload for delivery to every member of a room, minus
    /// the excluded user if any.
    pub async fn broadcast(
        &self,
        room_id: RoomId,
        payload: String,
        exclude: Option<UserId>,
    ) -> Result<(), HubError> {
        self.sender
            .send(HubCommand::Broadcast {
                room_id,
                payload,
                exclude,
            })
            .await
            .map_err(|_| HubError::Closed)
    }

    /// Returns the number of live connections in a room.
    ///
    /// Answered through the command channel, so the count reflects
    /// every operation submitted before this call.
    pub async fn occupancy(&self, room_id: RoomId) -> Result<usize, HubError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(HubCommand::Occupancy {
                room_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| HubError::Closed)?;
        reply_rx.await.map_err(|_| HubError::Closed)
    }
}

/// A registered connection as the hub tracks it.
struct Slot {
    conn_id: ConnectionId,
    display_name: String,
    buffer: mpsc::Sender<String>,
}

/// The internal hub actor state. Runs inside a Tokio task.
struct HubActor {
    rooms: HashMap<RoomId, HashMap<UserId, Slot>>,
    receiver: mpsc::Receiver<HubCommand>,
}

impl HubActor {
    /// Runs the actor loop until every handle is dropped.
    async fn run(mut self) {
        tracing::info!("hub started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                HubCommand::Register(registration) => {
                    self.handle_register(registration);
                }
                HubCommand::Unregister {
                    room_id,
                    user_id,
                    conn_id,
                } => {
                    self.handle_unregister(room_id, user_id, conn_id);
                }
                HubCommand::Broadcast {
                    room_id,
                    payload,
                    exclude,
                } => {
                    self.handle_broadcast(room_id, payload, exclude);
                }
                HubCommand::Occupancy { room_id, reply } => {
                    let count = self
                        .rooms
                        .get(&room_id)
                        .map_or(0, |members| members.len());
                    let _ = reply.send(count);
                }
            }
        }

        tracing::info!("hub stopped");
    }

    fn handle_register(&mut self, registration: Registration) {
        let Registration {
            room_id,
            user_id,
            display_name,
            conn_id,
            buffer,
        } = registration;

        let members = self.rooms.entry(room_id).or_default();
        let replaced = members
            .insert(
                user_id,
                Slot {
                    conn_id,
                    display_name,
                    buffer,
                },
            )
            .is_some();

        // The replaced slot's buffer sender was just dropped, which
        // closes the old connection's outbound channel.
        tracing::info!(
            room_id = %room_id,
            user_id = %user_id,
            %conn_id,
            members = members.len(),
            replaced,
            "connection registered"
        );
    }

    fn handle_unregister(
        &mut self,
        room_id: RoomId,
        user_id: UserId,
        conn_id: ConnectionId,
    ) {
        let Some(members) = self.rooms.get_mut(&room_id) else {
            return;
        };

        // Generation check: only the connection that owns the slot may
        // remove it. A stale unregister from a replaced connection is
        // a no-op.
        match members.get(&user_id) {
            Some(slot) if slot.conn_id == conn_id => {
                members.remove(&user_id);
                tracing::info!(
                    room_id = %room_id,
                    user_id = %user_id,
                    %conn_id,
                    members = members.len(),
                    "connection unregistered"
                );
            }
            _ => return,
        }

        if members.is_empty() {
            self.rooms.remove(&room_id);
            tracing::debug!(room_id = %room_id, "room set removed");
        }
    }

    fn handle_broadcast(
        &mut self,
        room_id: RoomId,
        payload: String,
        exclude: Option<UserId>,
    ) {
        let Some(members) = self.rooms.get_mut(&room_id) else {
            return;
        };

        let mut dead = Vec::new();
        for (user_id, slot) in members.iter() {
            if exclude == Some(*user_id) {
                continue;
            }
            match slot.buffer.try_send(payload.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) | Err(TrySendError::Closed(_)) => {
                    dead.push(*user_id);
                }
            }
        }

        for user_id in dead {
            if let Some(slot) = members.remove(&user_id) {
                tracing::info!(
                    room_id = %room_id,
                    user_id = %user_id,
                    display_name = %slot.display_name,
                    "dropping unresponsive connection"
                );
            }
        }

        if members.is_empty() {
            self.rooms.remove(&room_id);
        }
    }
}

/// Spawns the hub actor task and returns a handle to communicate with it.
///
/// `channel_size` bounds the command channel — if it fills up, callers
/// wait (backpressure on submitters, never on delivery).
pub fn spawn_hub(channel_size: usize) -> HubHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = HubActor {
        rooms: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    HubHandle { sender: tx }
}
