//! Error types for the playback layer.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Errors that can occur in the playback glue.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// The SDK handle is not connected.
    #[error("player not connected")]
    NotConnected,

    /// No playback device has announced itself yet.
    #[error("playback device not ready")]
    DeviceNotReady,

    /// Provider API call failed.
    #[error("provider API error: {0}")]
    Api(#[from] muse_client::Error),

    /// Failed to persist player preferences.
    #[error("failed to persist preferences: {0}")]
    Prefs(String),
}
