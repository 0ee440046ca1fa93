//! Per-connection handler: the join handshake.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Receive a `join` envelope naming a room code and a token
//!   2. Authenticate the token → `Identity`
//!   3. Resolve the room by code
//!   4. Send a `joined` ack, then hand the socket to the hub pumps
//!
//! Any failure closes only this socket; the server keeps running.

use std::sync::Arc;
use std::time::Duration;

use gamenight_hub::connect;
use gamenight_protocol::{Codec, Envelope, JsonCodec, ProtocolError};
use gamenight_transport::{WsConnection, WsWriter};
use serde::Deserialize;
use serde_json::json;

use crate::server::ServerState;
use crate::{Authenticator, ServerError};

/// How long a client has to send its join request.
const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Body of the `join` envelope.
#[derive(Debug, Deserialize)]
struct JoinRequest {
    /// Join code of the room to enter.
    room: String,
    /// Auth token for the external authenticator.
    token: String,
}

/// Handles a single connection from accept to pump hand-off.
pub(crate) async fn handle_connection<A: Authenticator>(
    conn: WsConnection,
    state: Arc<ServerState<A>>,
) -> Result<(), ServerError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let (mut writer, mut reader) = conn.split();

    let text = match tokio::time::timeout(JOIN_TIMEOUT, reader.next_text()).await
    {
        Ok(Ok(Some(text))) => text,
        Ok(Ok(None)) => {
            return Err(ProtocolError::InvalidMessage(
                "connection closed before join".into(),
            )
            .into());
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            return Err(
                ProtocolError::InvalidMessage("join timed out".into()).into()
            );
        }
    };

    let envelope: Envelope = state.codec.decode(&text)?;
    if envelope.kind != "join" {
        send_error(&mut writer, &state.codec, "first message must be join")
            .await?;
        writer.send_close().await;
        return Err(ProtocolError::InvalidMessage(
            "first message must be join".into(),
        )
        .into());
    }

    let request: JoinRequest = serde_json::from_value(envelope.content)
        .map_err(ProtocolError::Decode)?;

    let identity = match state.auth.authenticate(&request.token).await {
        Ok(identity) => identity,
        Err(e) => {
            send_error(&mut writer, &state.codec, "unauthorized").await?;
            writer.send_close().await;
            return Err(e.into());
        }
    };

    let room = match state.store.room_by_code(&request.room).await {
        Ok(room) => room,
        Err(e) => {
            send_error(&mut writer, &state.codec, "room not found").await?;
            writer.send_close().await;
            return Err(e.into());
        }
    };

    let ack = Envelope::server(
        "joined",
        json!({
            "room_id": room.id,
            "code": room.code,
            "game_type": room.game_type,
            "status": room.status,
            "players": room
                .players
                .iter()
                .map(|p| &p.display_name)
                .collect::<Vec<_>>(),
        }),
    );
    writer.send_text(state.codec.encode(&ack)?).await?;

    tracing::info!(
        %conn_id,
        user_id = %identity.user_id,
        room_id = %room.id,
        "player connected"
    );

    connect(
        state.hub.clone(),
        room.id,
        conn_id,
        identity,
        writer,
        reader,
    )
    .await?;

    Ok(())
}

/// Sends an `error` envelope to the client.
async fn send_error(
    writer: &mut WsWriter,
    codec: &JsonCodec,
    message: &str,
) -> Result<(), ServerError> {
    let envelope = Envelope::server("error", json!({ "message": message }));
    writer.send_text(codec.encode(&envelope)?).await?;
    Ok(())
}
