//! Configuration types.

use muse_auth::{AuthConfig, FlowMode};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MuseConfig {
    pub provider: ProviderConfig,
    pub player: PlayerConfig,
}

impl MuseConfig {
    /// Parse from a TOML string. Missing keys fall back to defaults.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Streaming provider endpoints and OAuth parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub client_id: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_base_url: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub flow: FlowMode,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::spotify()
    }
}

impl ProviderConfig {
    /// Defaults for the Spotify accounts service and Web API.
    pub fn spotify() -> Self {
        let auth = AuthConfig::spotify();
        Self {
            client_id: auth.client_id,
            auth_url: auth.auth_url,
            token_url: auth.token_url,
            api_base_url: "https://api.spotify.com/v1".to_string(),
            redirect_uri: auth.redirect_uri,
            scopes: auth.scopes,
            flow: auth.flow,
        }
    }

    /// The OAuth flow configuration for this provider.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            client_id: self.client_id.clone(),
            auth_url: self.auth_url.clone(),
            token_url: self.token_url.clone(),
            redirect_uri: self.redirect_uri.clone(),
            scopes: self.scopes.clone(),
            flow: self.flow,
        }
    }

    /// Absolute URL of the profile endpoint (the liveness probe).
    pub fn profile_url(&self) -> String {
        format!("{}/me", self.api_base_url.trim_end_matches('/'))
    }
}

/// Player defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial playback volume, 0.0–1.0, when no preference is saved.
    pub default_volume: f32,
    /// Device name announced to the provider.
    pub device_name: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: 0.5,
            device_name: "Muse Music Assistant".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MuseConfig::default();
        assert_eq!(config.provider.scopes.len(), 11);
        assert!(config.provider.api_base_url.contains("api.spotify.com"));
        assert_eq!(config.provider.flow, FlowMode::AuthorizationCode);
        assert_eq!(config.player.default_volume, 0.5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = MuseConfig::from_toml(
            r#"
            [provider]
            client_id = "my-client"
            flow = "implicit"
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.client_id, "my-client");
        assert_eq!(config.provider.flow, FlowMode::Implicit);
        // Untouched keys keep their defaults.
        assert!(config.provider.auth_url.contains("accounts.spotify.com"));
        assert_eq!(config.player.device_name, "Muse Music Assistant");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = MuseConfig::default();
        let parsed = MuseConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.provider.client_id, config.provider.client_id);
    }

    #[test]
    fn test_profile_url_trims_slash() {
        let mut provider = ProviderConfig::spotify();
        provider.api_base_url = "https://api.example/v1/".to_string();
        assert_eq!(provider.profile_url(), "https://api.example/v1/me");
    }

    #[test]
    fn test_auth_config_projection() {
        let provider = ProviderConfig::spotify();
        let auth = provider.auth_config();
        assert_eq!(auth.client_id, provider.client_id);
        assert_eq!(auth.scopes, provider.scopes);
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(MuseConfig::from_toml("provider = 3").is_err());
    }
}
