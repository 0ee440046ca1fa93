//! Per-connection pumps: the bridge between a WebSocket and the hub.
//!
//! Each connection runs two tasks. The inbound pump decodes frames,
//! stamps the authenticated identity over whatever the client claimed,
//! and submits the result for broadcast. The outbound pump drains the
//! connection's bounded buffer onto the socket. Neither pump touches
//! the other's half of the stream.

use gamenight_protocol::{Codec, Envelope, Identity, JsonCodec, RoomId};
use gamenight_transport::{ConnectionId, WsReader, WsWriter};
use tokio::sync::mpsc;

use crate::{HubError, HubHandle, Registration};

/// Capacity of a connection's outbound buffer. A peer that falls this
/// many messages behind is considered dead and dropped by the hub.
pub const OUTBOUND_BUFFER: usize = 256;

/// Wires a split connection into the hub: creates the outbound buffer,
/// registers, and spawns both pumps. Returns once registration is
/// submitted; the pumps run until the connection ends.
pub async fn connect(
    hub: HubHandle,
    room_id: RoomId,
    conn_id: ConnectionId,
    identity: Identity,
    writer: WsWriter,
    reader: WsReader,
) -> Result<(), HubError> {
    let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);

    hub.register(Registration {
        room_id,
        user_id: identity.user_id,
        display_name: identity.display_name.clone(),
        conn_id,
        buffer: tx,
    })
    .await?;

    tokio::spawn(write_pump(writer, rx));
    tokio::spawn(read_pump(reader, hub, room_id, conn_id, identity));

    Ok(())
}

/// Inbound pump: decode, stamp, broadcast. Malformed frames are skipped
/// without dropping the connection; transport errors and clean closes
/// end the loop, which unregisters the connection.
async fn read_pump(
    mut reader: WsReader,
    hub: HubHandle,
    room_id: RoomId,
    conn_id: ConnectionId,
    identity: Identity,
) {
    let codec = JsonCodec;

    loop {
        let text = match reader.next_text().await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!(
                    user_id = %identity.user_id,
                    "connection closed cleanly"
                );
                break;
            }
            Err(e) => {
                tracing::debug!(
                    user_id = %identity.user_id,
                    error = %e,
                    "read failed"
                );
                break;
            }
        };

        let mut envelope: Envelope = match codec.decode(&text) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(
                    user_id = %identity.user_id,
                    error = %e,
                    "skipping malformed frame"
                );
                continue;
            }
        };

        envelope.stamp(identity.user_id, &identity.display_name);

        let payload = match codec.encode(&envelope) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(
                    user_id = %identity.user_id,
                    error = %e,
                    "failed to re-encode envelope"
                );
                continue;
            }
        };

        if hub.broadcast(room_id, payload, None).await.is_err() {
            break;
        }
    }

    let _ = hub.unregister(room_id, identity.user_id, conn_id).await;
}

/// Outbound pump: drains the buffer onto the socket. A closed buffer
/// means the hub dropped or replaced this connection, so a close frame
/// is sent; a write failure just ends the pump (the inbound pump's
/// failure handles the unregister).
async fn write_pump(mut writer: WsWriter, mut rx: mpsc::Receiver<String>) {
    while let Some(payload) = rx.recv().await {
        if let Err(e) = writer.send_text(payload).await {
            tracing::debug!(id = %writer.id(), error = %e, "write failed");
            return;
        }
    }

    writer.send_close().await;
}
