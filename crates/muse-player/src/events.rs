//! Typed player events and subscriber fan-out.

use std::panic::{AssertUnwindSafe, catch_unwind};

use parking_lot::RwLock;

/// What went wrong in the playback layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerErrorKind {
    Initialization,
    Authentication,
    Account,
    Playback,
}

/// A track as reported by the playback SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub name: String,
    pub uri: String,
    pub artists: Vec<String>,
}

/// Playback snapshot delivered with [`PlayerEvent::StateChanged`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackState {
    pub track: Option<TrackInfo>,
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
}

/// Events published by the playback layer.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// The playback device connected and is addressable.
    Ready { device_id: String },
    /// Playback state changed.
    StateChanged(PlaybackState),
    /// The playback layer reported an error.
    Error {
        kind: PlayerErrorKind,
        message: String,
    },
}

type Subscriber = Box<dyn Fn(&PlayerEvent) + Send + Sync>;

/// Publish/subscribe fan-out for player events.
///
/// A panicking subscriber is logged and skipped; delivery continues to
/// the remaining subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for all subsequent events.
    pub fn subscribe(&self, subscriber: impl Fn(&PlayerEvent) + Send + Sync + 'static) {
        self.subscribers.write().push(Box::new(subscriber));
    }

    /// Deliver an event to every subscriber in registration order.
    pub fn publish(&self, event: &PlayerEvent) {
        let subscribers = self.subscribers.read();
        for subscriber in subscribers.iter() {
            if catch_unwind(AssertUnwindSafe(|| subscriber(event))).is_err() {
                tracing::warn!("player event subscriber panicked; continuing delivery");
            }
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ready() -> PlayerEvent {
        PlayerEvent::Ready {
            device_id: "d1".to_string(),
        }
    }

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = count.clone();
            bus.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.publish(&ready());
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_panicking_subscriber_does_not_block_delivery() {
        let bus = EventBus::new();
        let delivered = Arc::new(AtomicUsize::new(0));

        bus.subscribe(|_| panic!("boom"));
        {
            let delivered = delivered.clone();
            bus.subscribe(move |_| {
                delivered.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.publish(&ready());
        bus.publish(&ready());
        assert_eq!(delivered.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_subscriber_sees_payload() {
        let bus = EventBus::new();
        let seen = Arc::new(parking_lot::Mutex::new(None));
        {
            let seen = seen.clone();
            bus.subscribe(move |event| {
                if let PlayerEvent::Ready { device_id } = event {
                    *seen.lock() = Some(device_id.clone());
                }
            });
        }

        bus.publish(&ready());
        assert_eq!(seen.lock().as_deref(), Some("d1"));
    }
}
