//! Integration tests for the server: join handshake, identity
//! stamping, fan-out, and event injection.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use gamenight::{
    broadcast_event, AuthError, Authenticator, Envelope, GameEvent,
    GameServer, HubHandle, Identity, Room, Store, UserId,
};
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Test authenticator
// =========================================================================

/// Accepts tokens of the form "<user_id>:<display_name>".
struct TestAuth;

impl Authenticator for TestAuth {
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let (id, name) = token
            .split_once(':')
            .ok_or_else(|| AuthError::AuthFailed("malformed token".into()))?;
        let id: i64 = id
            .parse()
            .map_err(|_| AuthError::AuthFailed("not a number".into()))?;
        Ok(Identity {
            user_id: UserId(id),
            display_name: name.to_string(),
        })
    }
}

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port with a fresh in-memory store.
async fn start_server() -> (String, Store, HubHandle) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gamenight=debug")
        .try_init();

    let store = Store::in_memory().await.expect("store");
    let server = GameServer::<TestAuth>::builder()
        .bind("127.0.0.1:0")
        .build(store.clone(), TestAuth)
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();
    let hub = server.hub();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    (addr, store, hub)
}

/// Creates a host user and a room for it, returning `(host_id, room)`.
async fn seed_room(store: &Store, game: &str) -> (UserId, Room) {
    let host = store.create_user("alice").await.expect("create host");
    let room = store.create_room(game, host).await.expect("create room");
    (host, room)
}

async fn ws_connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

fn text_message(value: &serde_json::Value) -> Message {
    Message::Text(value.to_string().into())
}

fn decode_envelope(msg: Message) -> Envelope {
    serde_json::from_str(msg.into_text().expect("text frame").as_str())
        .expect("decode")
}

async fn recv_envelope(ws: &mut ClientWs) -> Envelope {
    let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("no frame within timeout")
        .expect("stream ended")
        .expect("recv");
    decode_envelope(msg)
}

/// Sends a join request and returns the `joined` ack.
async fn join(ws: &mut ClientWs, room_code: &str, token: &str) -> Envelope {
    ws.send(text_message(&json!({
        "type": "join",
        "content": { "room": room_code, "token": token },
    })))
    .await
    .expect("send join");
    recv_envelope(ws).await
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_join_handshake_success() {
    let (addr, store, _hub) = start_server().await;
    let (host, room) = seed_room(&store, "blindtest").await;

    let mut ws = ws_connect(&addr).await;
    let ack = join(&mut ws, &room.code, &format!("{}:alice", host.0)).await;

    assert_eq!(ack.kind, "joined");
    assert_eq!(ack.from, "server");
    assert_eq!(ack.content["code"], room.code);
    assert_eq!(ack.content["game_type"], "blindtest");
    assert_eq!(ack.content["status"], "waiting");
    assert_eq!(ack.content["players"][0], "alice");
}

#[tokio::test]
async fn test_join_unknown_room_is_refused() {
    let (addr, _store, _hub) = start_server().await;

    let mut ws = ws_connect(&addr).await;
    let reply = join(&mut ws, "zzzzzz", "1:alice").await;

    assert_eq!(reply.kind, "error");
    assert_eq!(reply.content["message"], "room not found");
}

#[tokio::test]
async fn test_join_bad_token_is_refused() {
    let (addr, store, _hub) = start_server().await;
    let (_host, room) = seed_room(&store, "blindtest").await;

    let mut ws = ws_connect(&addr).await;
    let reply = join(&mut ws, &room.code, "no-colon-here").await;

    assert_eq!(reply.kind, "error");
    assert_eq!(reply.content["message"], "unauthorized");
}

#[tokio::test]
async fn test_first_message_must_be_join() {
    let (addr, _store, _hub) = start_server().await;

    let mut ws = ws_connect(&addr).await;
    ws.send(text_message(&json!({
        "type": "chat",
        "content": { "text": "hello?" },
    })))
    .await
    .expect("send");

    let reply = recv_envelope(&mut ws).await;
    assert_eq!(reply.kind, "error");
}

#[tokio::test]
async fn test_chat_fan_out_with_stamped_identity() {
    let (addr, store, _hub) = start_server().await;
    let (host, room) = seed_room(&store, "blindtest").await;
    let bob = store.create_user("bob").await.unwrap();
    store.join_room(&room.code, bob).await.unwrap();

    let mut ws_alice = ws_connect(&addr).await;
    join(&mut ws_alice, &room.code, &format!("{}:alice", host.0)).await;
    let mut ws_bob = ws_connect(&addr).await;
    join(&mut ws_bob, &room.code, &format!("{}:bob", bob.0)).await;

    // Let both registrations land in the hub.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Alice sends a chat message with a spoofed identity.
    ws_alice
        .send(text_message(&json!({
            "type": "chat",
            "from": "impostor",
            "user_id": 999,
            "content": { "text": "bonsoir" },
        })))
        .await
        .expect("send chat");

    // Both members receive it, sender included, with the spoofed
    // identity overwritten.
    for ws in [&mut ws_alice, &mut ws_bob] {
        let env = recv_envelope(ws).await;
        assert_eq!(env.kind, "chat");
        assert_eq!(env.from, "alice");
        assert_eq!(env.user_id, host);
        assert_eq!(env.content["text"], "bonsoir");
    }
}

#[tokio::test]
async fn test_malformed_frame_skipped_without_dropping_connection() {
    let (addr, store, _hub) = start_server().await;
    let (host, room) = seed_room(&store, "petitbac").await;

    let mut ws = ws_connect(&addr).await;
    join(&mut ws, &room.code, &format!("{}:alice", host.0)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Garbage first; the connection must survive it.
    ws.send(Message::Text("not json".into())).await.expect("send");

    ws.send(text_message(&json!({
        "type": "chat",
        "content": { "text": "still here" },
    })))
    .await
    .expect("send");

    let env = recv_envelope(&mut ws).await;
    assert_eq!(env.kind, "chat");
    assert_eq!(env.content["text"], "still here");
}

#[tokio::test]
async fn test_broadcast_event_reaches_members() {
    let (addr, store, hub) = start_server().await;
    let (host, room) = seed_room(&store, "petitbac").await;

    let mut ws = ws_connect(&addr).await;
    join(&mut ws, &room.code, &format!("{}:alice", host.0)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    broadcast_event(
        &hub,
        room.id,
        GameEvent::RoundStart {
            round: 1,
            total_rounds: 4,
            letter: Some('M'),
        },
    )
    .await
    .expect("broadcast event");

    let env = recv_envelope(&mut ws).await;
    assert_eq!(env.kind, "round_start");
    assert_eq!(env.from, "server");
    assert_eq!(env.user_id, UserId(0));
    assert_eq!(env.content["round"], 1);
    assert_eq!(env.content["letter"], "M");
}

#[tokio::test]
async fn test_messages_relayed_in_order() {
    let (addr, store, _hub) = start_server().await;
    let (host, room) = seed_room(&store, "blindtest").await;

    let mut ws = ws_connect(&addr).await;
    join(&mut ws, &room.code, &format!("{}:alice", host.0)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    for i in 0..5 {
        ws.send(text_message(&json!({
            "type": "chat",
            "content": { "n": i },
        })))
        .await
        .expect("send");
    }

    for i in 0..5 {
        let env = recv_envelope(&mut ws).await;
        assert_eq!(env.content["n"], i);
    }
}
