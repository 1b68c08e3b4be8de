//! Provider API request and response types.

use serde::{Deserialize, Serialize};

/// Display profile returned by the `me` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Subscription tier, e.g. `premium`.
    #[serde(default)]
    pub product: Option<String>,
}

/// A playback device known to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Absent for devices the provider refuses to address.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_restricted: bool,
    #[serde(default)]
    pub volume_percent: Option<u8>,
}

/// Envelope for the devices listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// A track reference in playback responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

/// Currently-playing snapshot. The provider answers 204 when nothing is
/// playing, which the client surfaces as `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub item: Option<Track>,
}

/// Body for the play endpoint. Track URIs ride in `uris`; playlist and
/// album URIs are a playback context.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_uri: Option<String>,
}

impl PlayRequest {
    /// Build a request for a single URI, routing it to `uris` or
    /// `context_uri` by its kind.
    pub fn for_uri(uri: &str) -> Self {
        if uri.starts_with("spotify:track:") {
            Self {
                uris: Some(vec![uri.to_string()]),
                ..Self::default()
            }
        } else {
            Self {
                context_uri: Some(uri.to_string()),
                ..Self::default()
            }
        }
    }
}

/// Body for the transfer-playback endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub device_ids: Vec<String>,
    pub play: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_request_track_uri() {
        let request = PlayRequest::for_uri("spotify:track:4uLU6hMCjMI75M1A2tKUQC");
        assert_eq!(
            request.uris.as_deref(),
            Some(&["spotify:track:4uLU6hMCjMI75M1A2tKUQC".to_string()][..])
        );
        assert!(request.context_uri.is_none());
    }

    #[test]
    fn test_play_request_playlist_uri() {
        let request = PlayRequest::for_uri("spotify:playlist:37i9dQZF1DX0SM0LYsmbMT");
        assert!(request.uris.is_none());
        assert_eq!(
            request.context_uri.as_deref(),
            Some("spotify:playlist:37i9dQZF1DX0SM0LYsmbMT")
        );
    }

    #[test]
    fn test_play_request_serializes_without_nulls() {
        let json = serde_json::to_string(&PlayRequest::for_uri("spotify:track:x")).unwrap();
        assert!(!json.contains("context_uri"));
    }

    #[test]
    fn test_device_parse() {
        let json = r#"{
            "id": "d1",
            "name": "Kitchen speaker",
            "type": "Speaker",
            "is_active": true,
            "volume_percent": 40
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.id.as_deref(), Some("d1"));
        assert_eq!(device.kind, "Speaker");
        assert!(device.is_active);
        assert!(!device.is_restricted);
    }
}
