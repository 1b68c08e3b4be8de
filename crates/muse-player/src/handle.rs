//! Seam to the externally supplied playback SDK.

use async_trait::async_trait;

/// Operations the external playback SDK must provide.
///
/// The transport behind these calls (connection management, audio,
/// buffering) is entirely the SDK's concern. Implementations report
/// plain success/failure the way the SDK does; richer failures arrive
/// as events fed into the controller.
#[async_trait]
pub trait PlayerHandle: Send + Sync + std::fmt::Debug {
    /// Connect to the playback transport. `false` means the SDK refused
    /// the connection.
    async fn connect(&self) -> bool;

    /// Tear down the transport connection.
    async fn disconnect(&self);

    /// Toggle play/pause on the local device.
    async fn toggle_play(&self) -> bool;

    /// Skip to the next track.
    async fn next_track(&self) -> bool;

    /// Skip to the previous track.
    async fn previous_track(&self) -> bool;

    /// Set volume in the 0.0–1.0 range.
    async fn set_volume(&self, volume: f32) -> bool;
}
