//! WebSocket listener and split connection halves over `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

use crate::{ConnectionId, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<TcpStream>;

/// Listens for incoming WebSocket connections.
pub struct WsListener {
    listener: TcpListener,
}

impl WsListener {
    /// Binds a listener to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "WebSocket listener bound");
        Ok(Self { listener })
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for and upgrades the next incoming connection.
    pub async fn accept(&mut self) -> Result<WsConnection, TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
            TransportError::AcceptFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                e,
            ))
        })?;

        let id =
            ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted WebSocket connection");

        Ok(WsConnection { id, ws })
    }
}

/// A single accepted WebSocket connection, not yet split.
pub struct WsConnection {
    id: ConnectionId,
    ws: WsStream,
}

impl WsConnection {
    /// Returns the unique identifier for this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Splits the connection into independent write and read halves.
    pub fn split(self) -> (WsWriter, WsReader) {
        let (sink, stream) = self.ws.split();
        (
            WsWriter {
                id: self.id,
                sink,
            },
            WsReader {
                id: self.id,
                stream,
            },
        )
    }
}

/// The outbound half of a connection.
pub struct WsWriter {
    id: ConnectionId,
    sink: SplitSink<WsStream, Message>,
}

impl WsWriter {
    /// Returns the identifier of the connection this half belongs to.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Sends a text frame to the remote peer.
    pub async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sink.send(Message::Text(text.into())).await.map_err(|e| {
            TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                e,
            ))
        })
    }

    /// Sends a close frame. Errors are swallowed: by the time this is
    /// called the peer is usually already gone.
    pub async fn send_close(&mut self) {
        let _ = self.sink.send(Message::Close(None)).await;
    }
}

/// The inbound half of a connection.
pub struct WsReader {
    id: ConnectionId,
    stream: SplitStream<WsStream>,
}

impl WsReader {
    /// Returns the identifier of the connection this half belongs to.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Receives the next text payload from the remote peer.
    ///
    /// Binary frames with valid UTF-8 are accepted as text; ping/pong
    /// and invalid binary frames are skipped. Returns `Ok(None)` when
    /// the connection is cleanly closed.
    pub async fn next_text(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(data))) => {
                    match String::from_utf8(data.to_vec()) {
                        Ok(text) => return Ok(Some(text)),
                        Err(_) => {
                            tracing::debug!(
                                id = %self.id,
                                "skipping non-UTF-8 binary frame"
                            );
                            continue;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/raw frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }
}
