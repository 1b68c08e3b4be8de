//! Playback glue over an externally supplied playback SDK.
//!
//! Muse never implements playback transport. The hosting application
//! wires the provider's SDK behind a [`PlayerHandle`] and feeds its
//! events into a [`PlayerController`], which tracks the active device,
//! republishes typed [`PlayerEvent`]s, persists the volume preference,
//! and routes playback commands through the provider REST API.

pub mod controller;
pub mod error;
pub mod events;
pub mod handle;
pub mod prefs;

pub use {
    controller::PlayerController,
    error::{PlayerError, Result},
    events::{EventBus, PlaybackState, PlayerErrorKind, PlayerEvent, TrackInfo},
    handle::PlayerHandle,
    prefs::{DEFAULT_VOLUME, PlayerPrefs},
};
