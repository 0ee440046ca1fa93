/// Errors that can occur when talking to the hub.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The hub actor is no longer running.
    #[error("hub is not running")]
    Closed,
}
