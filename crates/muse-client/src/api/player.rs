//! Player API: devices, playback, transfer.

use crate::client::ProviderClient;
use crate::error::Result;
use crate::types::{CurrentlyPlaying, Device, DevicesResponse, PlayRequest, TransferRequest};

/// Player API client.
pub struct PlayerApi {
    client: ProviderClient,
}

impl PlayerApi {
    pub(crate) fn new(client: ProviderClient) -> Self {
        Self { client }
    }

    /// List the devices available for playback.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let response: DevicesResponse = self.client.get("me/player/devices").await?;
        Ok(response.devices)
    }

    /// What is playing right now, if anything. The provider answers 204
    /// when nothing is playing.
    pub async fn currently_playing(&self) -> Result<Option<CurrentlyPlaying>> {
        self.client.get_optional("me/player/currently-playing").await
    }

    /// Start playback of a track or context URI, optionally on a
    /// specific device.
    pub async fn play(&self, uri: &str, device_id: Option<&str>) -> Result<()> {
        let body = PlayRequest::for_uri(uri);
        match device_id {
            Some(id) => {
                self.client
                    .put_empty_with_query("me/player/play", &[("device_id", id)], &body)
                    .await
            }
            None => self.client.put_empty("me/player/play", &body).await,
        }
    }

    /// Transfer playback to another device.
    pub async fn transfer(&self, device_id: &str, play: bool) -> Result<()> {
        let body = TransferRequest {
            device_ids: vec![device_id.to_string()],
            play,
        };
        self.client.put_empty("me/player", &body).await
    }
}
