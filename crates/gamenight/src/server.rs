//! `GameServer` builder and accept loop.

use std::sync::Arc;

use gamenight_hub::{spawn_hub, HubHandle};
use gamenight_protocol::JsonCodec;
use gamenight_store::Store;
use gamenight_transport::WsListener;

use crate::handler::handle_connection;
use crate::{Authenticator, ServerError};

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<A: Authenticator> {
    pub(crate) hub: HubHandle,
    pub(crate) store: Store,
    pub(crate) auth: A,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Gamenight server.
pub struct GameServerBuilder {
    bind_addr: String,
    hub_commands: usize,
}

impl GameServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            hub_commands: 64,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the capacity of the hub's command channel.
    pub fn hub_commands(mut self, capacity: usize) -> Self {
        self.hub_commands = capacity;
        self
    }

    /// Binds the listener, spawns the hub, and returns the server.
    pub async fn build<A: Authenticator>(
        self,
        store: Store,
        auth: A,
    ) -> Result<GameServer<A>, ServerError> {
        let listener = WsListener::bind(&self.bind_addr).await?;
        let hub = spawn_hub(self.hub_commands);

        let state = Arc::new(ServerState {
            hub,
            store,
            auth,
            codec: JsonCodec,
        });

        Ok(GameServer { listener, state })
    }
}

impl Default for GameServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Gamenight server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GameServer<A: Authenticator> {
    listener: WsListener,
    state: Arc<ServerState<A>>,
}

impl<A: Authenticator> GameServer<A> {
    /// Creates a new builder.
    pub fn builder() -> GameServerBuilder {
        GameServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// A handle to the hub, for injecting server-originated events.
    pub fn hub(&self) -> HubHandle {
        self.state.hub.clone()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for
    /// each. Handshake and per-connection failures are logged and
    /// contained; only accept failures surface here.
    pub async fn run(mut self) -> Result<(), ServerError> {
        tracing::info!("Gamenight server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
