//! Authentication hook for the join handshake.
//!
//! Gamenight does not validate credentials itself — that belongs to
//! the embedding application (session cookies, JWT, an auth provider).
//! The [`Authenticator`] trait is the seam: one async method that maps
//! a token to an [`Identity`], called once per connection during the
//! join handshake.

use gamenight_protocol::Identity;

/// Errors produced by an [`Authenticator`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token is invalid, expired, or unknown.
    #[error("authentication failed: {0}")]
    AuthFailed(String),
}

/// Validates a client's token and returns who it belongs to.
///
/// `Send + Sync + 'static` because the authenticator is shared across
/// connection handler tasks for the lifetime of the server.
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the given token and returns the caller's identity.
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Identity, AuthError>> + Send;
}
