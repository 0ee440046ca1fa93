//! Codec trait and implementations for the text-frame wire format.
//!
//! The coordination core never assumes JSON directly — it goes through
//! the [`Codec`] trait, so the wire format can change without touching
//! the hub or the server. [`JsonCodec`] is the provided implementation,
//! matching the browser clients which exchange JSON text frames.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes values to text frames and decodes them back.
///
/// `Send + Sync + 'static` because the codec is shared across the
/// per-connection pump tasks for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame body.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a text frame body back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the text is malformed or does
    /// not match the expected shape.
    fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
    ) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON (via `serde_json`).
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
    ) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}
