//! Unified error type for the Gamenight backend.

use gamenight_hub::HubError;
use gamenight_protocol::ProtocolError;
use gamenight_store::StoreError;
use gamenight_transport::TransportError;

use crate::AuthError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From`
/// impls, so `?` converts sub-crate errors automatically. None of
/// these are fatal to the server: connection handlers log them and
/// only the offending socket is affected.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The hub actor is gone.
    #[error(transparent)]
    Hub(#[from] HubError),

    /// A persistence or lifecycle error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The join token was rejected.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamenight_lobby::LobbyError;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Transport(_)));
        assert!(server_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Protocol(_)));
    }

    #[test]
    fn test_from_hub_error() {
        let server_err: ServerError = HubError::Closed.into();
        assert!(matches!(server_err, ServerError::Hub(_)));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Lobby(LobbyError::NotFound);
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Store(_)));
        assert!(server_err.to_string().contains("not found"));
    }

    #[test]
    fn test_from_auth_error() {
        let err = AuthError::AuthFailed("nope".into());
        let server_err: ServerError = err.into();
        assert!(matches!(server_err, ServerError::Auth(_)));
    }
}
