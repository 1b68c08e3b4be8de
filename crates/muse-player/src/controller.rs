//! Playback controller: device tracking, playback commands, recovery.
//!
//! The hosting application forwards SDK events into `on_ready`,
//! `on_state_changed`, and `on_error`; the controller republishes them
//! as typed [`PlayerEvent`]s and keeps the session-scoped player state
//! that the original design kept in module globals.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use muse_auth::AuthFlow;
use muse_client::ProviderClient;
use parking_lot::RwLock;

use crate::error::{PlayerError, Result};
use crate::events::{EventBus, PlaybackState, PlayerErrorKind, PlayerEvent};
use crate::handle::PlayerHandle;
use crate::prefs::PlayerPrefs;

#[derive(Debug, Default)]
struct ControllerState {
    connected: bool,
    device_id: Option<String>,
    playback: Option<PlaybackState>,
    volume: f32,
}

/// Owns the SDK handle, the active device, and the persisted volume
/// preference; routes playback commands through the provider API.
#[derive(Debug)]
pub struct PlayerController {
    handle: Arc<dyn PlayerHandle>,
    client: ProviderClient,
    flow: AuthFlow,
    events: Arc<EventBus>,
    state: RwLock<ControllerState>,
    data_dir: PathBuf,
}

impl PlayerController {
    /// Create a controller. The initial volume comes from the persisted
    /// preference, defaulting when none has been saved.
    pub fn new(
        handle: Arc<dyn PlayerHandle>,
        client: ProviderClient,
        flow: AuthFlow,
        data_dir: &Path,
    ) -> Self {
        let volume = PlayerPrefs::load(data_dir).clamped_volume();
        Self {
            handle,
            client,
            flow,
            events: Arc::new(EventBus::new()),
            state: RwLock::new(ControllerState {
                volume,
                ..ControllerState::default()
            }),
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// The event bus carrying [`PlayerEvent`]s.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Connect the SDK transport.
    pub async fn connect(&self) -> Result<()> {
        if self.state.read().connected {
            return Ok(());
        }
        if !self.handle.connect().await {
            return Err(PlayerError::NotConnected);
        }
        self.state.write().connected = true;
        Ok(())
    }

    /// Tear down the SDK transport and forget the active device.
    pub async fn disconnect(&self) {
        self.handle.disconnect().await;
        let mut state = self.state.write();
        state.connected = false;
        state.device_id = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // SDK event intake
    // ─────────────────────────────────────────────────────────────────────────

    /// The SDK announced its playback device.
    pub fn on_ready(&self, device_id: impl Into<String>) {
        let device_id = device_id.into();
        self.state.write().device_id = Some(device_id.clone());
        tracing::info!(device_id, "playback device ready");
        self.events.publish(&PlayerEvent::Ready { device_id });
    }

    /// The SDK reported a playback state change.
    pub fn on_state_changed(&self, playback: PlaybackState) {
        self.state.write().playback = Some(playback.clone());
        self.events.publish(&PlayerEvent::StateChanged(playback));
    }

    /// The SDK reported an error.
    ///
    /// Authentication errors get one refresh-and-reconnect attempt
    /// before being surfaced; everything else is published as-is.
    pub async fn on_error(&self, kind: PlayerErrorKind, message: impl Into<String>) {
        let message = message.into();
        if kind == PlayerErrorKind::Authentication {
            tracing::warn!(message, "playback authentication error, refreshing");
            if self.flow.refresh().await.is_ok() {
                self.disconnect().await;
                if self.connect().await.is_ok() {
                    return;
                }
            }
        }
        self.events.publish(&PlayerEvent::Error { kind, message });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Playback commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Start playback of a track or context URI on the active device.
    pub async fn play(&self, uri: &str) -> Result<()> {
        let device_id = self
            .state
            .read()
            .device_id
            .clone()
            .ok_or(PlayerError::DeviceNotReady)?;
        self.client.player().play(uri, Some(&device_id)).await?;
        Ok(())
    }

    /// Transfer playback to another device.
    pub async fn transfer(&self, device_id: &str, play: bool) -> Result<()> {
        self.client.player().transfer(device_id, play).await?;
        Ok(())
    }

    /// Toggle play/pause on the local device.
    pub async fn toggle_play(&self) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.handle.toggle_play().await)
    }

    /// Skip to the next track.
    pub async fn next_track(&self) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.handle.next_track().await)
    }

    /// Skip to the previous track.
    pub async fn previous_track(&self) -> Result<bool> {
        self.ensure_connected()?;
        Ok(self.handle.previous_track().await)
    }

    /// Set the playback volume, persisting it on success.
    pub async fn set_volume(&self, volume: f32) -> Result<()> {
        self.ensure_connected()?;
        let volume = volume.clamp(0.0, 1.0);
        if !self.handle.set_volume(volume).await {
            return Err(PlayerError::NotConnected);
        }
        self.state.write().volume = volume;
        PlayerPrefs { volume }.save(&self.data_dir)?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Getters
    // ─────────────────────────────────────────────────────────────────────────

    pub fn device_id(&self) -> Option<String> {
        self.state.read().device_id.clone()
    }

    pub fn playback(&self) -> Option<PlaybackState> {
        self.state.read().playback.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state
            .read()
            .playback
            .as_ref()
            .is_some_and(|p| p.is_playing)
    }

    pub fn volume(&self) -> f32 {
        self.state.read().volume
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.state.read().connected {
            Ok(())
        } else {
            Err(PlayerError::NotConnected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TrackInfo;
    use async_trait::async_trait;
    use muse_auth::{AuthConfig, FlowMode, MemoryTokenStore, TokenBundle};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tempfile::tempdir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Default)]
    struct MockHandle {
        connects: AtomicUsize,
        disconnects: AtomicUsize,
        volumes: parking_lot::Mutex<Vec<f32>>,
        refuse_connect: AtomicBool,
    }

    #[async_trait]
    impl PlayerHandle for MockHandle {
        async fn connect(&self) -> bool {
            self.connects.fetch_add(1, Ordering::SeqCst);
            !self.refuse_connect.load(Ordering::SeqCst)
        }

        async fn disconnect(&self) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }

        async fn toggle_play(&self) -> bool {
            true
        }

        async fn next_track(&self) -> bool {
            true
        }

        async fn previous_track(&self) -> bool {
            true
        }

        async fn set_volume(&self, volume: f32) -> bool {
            self.volumes.lock().push(volume);
            true
        }
    }

    fn test_flow(server: &MockServer, refresh_token: Option<&str>) -> AuthFlow {
        let store = Arc::new(MemoryTokenStore::with_tokens(TokenBundle {
            access_token: "access".to_string(),
            refresh_token: refresh_token.map(|s| s.to_string()),
            expires_at: u64::MAX,
        }));
        AuthFlow::new(
            AuthConfig {
                client_id: "test-client".to_string(),
                auth_url: format!("{}/authorize", server.uri()),
                token_url: format!("{}/api/token", server.uri()),
                redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
                scopes: vec![],
                flow: FlowMode::AuthorizationCode,
            },
            store,
        )
    }

    fn controller_for(
        server: &MockServer,
        handle: Arc<MockHandle>,
        data_dir: &Path,
        refresh_token: Option<&str>,
    ) -> PlayerController {
        let flow = test_flow(server, refresh_token);
        let client = ProviderClient::builder()
            .base_url(format!("{}/v1", server.uri()))
            .flow(flow.clone())
            .build()
            .unwrap();
        PlayerController::new(handle, client, flow, data_dir)
    }

    #[tokio::test]
    async fn test_on_ready_records_device_and_publishes() {
        let server = MockServer::start().await;
        let temp = tempdir().unwrap();
        let controller = controller_for(&server, Arc::new(MockHandle::default()), temp.path(), None);

        let seen = Arc::new(parking_lot::Mutex::new(None));
        {
            let seen = seen.clone();
            controller.events().subscribe(move |event| {
                if let PlayerEvent::Ready { device_id } = event {
                    *seen.lock() = Some(device_id.clone());
                }
            });
        }

        controller.on_ready("d1");
        assert_eq!(controller.device_id().as_deref(), Some("d1"));
        assert_eq!(seen.lock().as_deref(), Some("d1"));
    }

    #[tokio::test]
    async fn test_play_requires_ready_device() {
        let server = MockServer::start().await;
        let temp = tempdir().unwrap();
        let controller = controller_for(&server, Arc::new(MockHandle::default()), temp.path(), None);

        let err = controller.play("spotify:track:abc").await.unwrap_err();
        assert!(matches!(err, PlayerError::DeviceNotReady));
    }

    #[tokio::test]
    async fn test_play_targets_active_device() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/me/player/play"))
            .and(query_param("device_id", "d1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let controller = controller_for(&server, Arc::new(MockHandle::default()), temp.path(), None);
        controller.on_ready("d1");

        controller.play("spotify:track:abc").await.unwrap();
    }

    #[tokio::test]
    async fn test_commands_require_connection() {
        let server = MockServer::start().await;
        let temp = tempdir().unwrap();
        let controller = controller_for(&server, Arc::new(MockHandle::default()), temp.path(), None);

        assert!(matches!(
            controller.toggle_play().await,
            Err(PlayerError::NotConnected)
        ));

        controller.connect().await.unwrap();
        assert!(controller.toggle_play().await.unwrap());
    }

    #[tokio::test]
    async fn test_set_volume_clamps_and_persists() {
        let server = MockServer::start().await;
        let temp = tempdir().unwrap();
        let handle = Arc::new(MockHandle::default());
        let controller = controller_for(&server, handle.clone(), temp.path(), None);
        controller.connect().await.unwrap();

        controller.set_volume(1.5).await.unwrap();
        assert_eq!(handle.volumes.lock().as_slice(), &[1.0]);
        assert_eq!(controller.volume(), 1.0);
        assert_eq!(PlayerPrefs::load(temp.path()).volume, 1.0);
    }

    #[tokio::test]
    async fn test_initial_volume_from_prefs() {
        let server = MockServer::start().await;
        let temp = tempdir().unwrap();
        PlayerPrefs { volume: 0.8 }.save(temp.path()).unwrap();

        let controller = controller_for(&server, Arc::new(MockHandle::default()), temp.path(), None);
        assert_eq!(controller.volume(), 0.8);
    }

    #[tokio::test]
    async fn test_auth_error_refreshes_and_reconnects() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "fresh",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let handle = Arc::new(MockHandle::default());
        let controller = controller_for(&server, handle.clone(), temp.path(), Some("refresh"));
        controller.connect().await.unwrap();

        let errors = Arc::new(AtomicUsize::new(0));
        {
            let errors = errors.clone();
            controller.events().subscribe(move |event| {
                if matches!(event, PlayerEvent::Error { .. }) {
                    errors.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        controller
            .on_error(PlayerErrorKind::Authentication, "token rejected")
            .await;

        // Recovered silently: one reconnect, no error event.
        assert_eq!(handle.connects.load(Ordering::SeqCst), 2);
        assert_eq!(handle.disconnects.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auth_error_refresh_failure_published() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;

        let temp = tempdir().unwrap();
        let controller = controller_for(
            &server,
            Arc::new(MockHandle::default()),
            temp.path(),
            Some("refresh"),
        );

        let errors = Arc::new(AtomicUsize::new(0));
        {
            let errors = errors.clone();
            controller.events().subscribe(move |event| {
                if matches!(
                    event,
                    PlayerEvent::Error {
                        kind: PlayerErrorKind::Authentication,
                        ..
                    }
                ) {
                    errors.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        controller
            .on_error(PlayerErrorKind::Authentication, "token rejected")
            .await;
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_state_changed_tracked() {
        let server = MockServer::start().await;
        let temp = tempdir().unwrap();
        let controller = controller_for(&server, Arc::new(MockHandle::default()), temp.path(), None);

        controller.on_state_changed(PlaybackState {
            track: Some(TrackInfo {
                name: "So What".to_string(),
                uri: "spotify:track:abc".to_string(),
                artists: vec!["Miles Davis".to_string()],
            }),
            is_playing: true,
            position_ms: 1000,
            duration_ms: 545_000,
        });

        assert!(controller.is_playing());
        assert_eq!(
            controller.playback().unwrap().track.unwrap().name,
            "So What"
        );
    }
}
